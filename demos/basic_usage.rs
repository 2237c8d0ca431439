use helper_kit::{
    assertions, bail, ensure_that, Exception, ExceptionKind, Result,
};

fn parse_quantity(raw: &str) -> Result<u32> {
    let quantity: u32 = match raw.trim().parse() {
        Ok(quantity) => quantity,
        Err(err) => {
            return Err(Exception::invalid_argument(format!("not a quantity: {raw}"))
                .with_cause(helper_kit::Cause::error(err)));
        }
    };
    ensure_that!(quantity <= 100, OutOfRangeError, "quantity {} exceeds 100", quantity);
    Ok(quantity)
}

fn checkout(cart: Option<&str>) -> Result<u32> {
    let raw = assertions::ensure_non_nullable(cart, Some("Cart not found"))?;
    if raw.is_empty() {
        bail!(LengthError, "cart is empty");
    }
    parse_quantity(raw)
}

fn main() {
    println!("--- Basic Usage Example ---\n");

    for cart in [Some("3"), Some("250"), Some("three"), Some(""), None] {
        match checkout(cart) {
            Ok(quantity) => println!("{cart:?}: ok, {quantity} items"),
            Err(err) => {
                // 1. What the caller sees
                println!("{cart:?}: {err}");

                // 2. Category checks walk the lattice
                let bucket = if err.is(ExceptionKind::LogicError) {
                    "caller bug"
                } else if err.is(ExceptionKind::RuntimeError) {
                    "runtime condition"
                } else {
                    "other"
                };
                println!("   bucket:  {bucket}");

                // 3. Structured log line
                err.with_log(|log| {
                    let mut line = String::new();
                    if log.write_to(&mut line).is_ok() {
                        println!("   log:     {line}");
                    }
                });
            }
        }
    }
}
