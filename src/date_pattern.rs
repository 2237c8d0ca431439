//! LDML-style date patterns (`yyyy-MM-dd`, `MMM d, yyyy`, ...).
//!
//! A pattern is compiled once into tokens and can then render a date or
//! read one back. Compilation rejects unknown unescaped ASCII letters, so a
//! typo in a pattern is an error rather than literal output.
//!
//! | Token | Meaning | Parse |
//! |---|---|---|
//! | `y` / `yyyy` / `yyy`, `yyyyy`.. | year, unpadded / zero-padded to the run length | 1-4 digits |
//! | `yy` | two-digit year | 1-2 digits, sliding 50-year window |
//! | `Q` .. `QQQQQ` | `4`, `04`, `Q4`, `4th quarter`, `4` | format only |
//! | `M` / `MM` (`L` / `LL`) | month number | 1-2 digits |
//! | `MMM` / `MMMM` (`LLL` / `LLLL`) | `Jan` / `January` | case-insensitive |
//! | `MMMMM` (`LLLLL`) | `J` | format only |
//! | `d` / `dd` | day of month | 1-2 digits |
//! | `do` | `21st` | format only |
//! | `H` / `HH` | hour 0-23 | 1-2 digits |
//! | `h` / `hh` | hour 1-12 | 1-2 digits |
//! | `k` / `kk`, `K` / `KK` | hour 1-24, hour 0-11 | format only |
//! | `m` / `mm`, `s` / `ss` | minute, second | 1-2 digits |
//! | `S`, `SS`, `SSS`, .. | fraction of a second, truncated to the run length | `SSS` only, 3 digits |
//! | `a` / `aa`, `aaa` | `AM` / `am` | case-insensitive |
//! | `aaaa`, `aaaaa` | `a.m.`, `a` | format only |
//! | `E` .. `EEE`, `EEEE`, `EEEEE`, `EEEEEE` | `Mon`, `Monday`, `M`, `Mo` | format only |
//! | `P` .. `PPPP` | `10/21/2019` .. `Monday, October 21st, 2019` | format only |
//!
//! Text inside single quotes is literal; `''` is a literal quote. Any
//! character that is not an ASCII letter is literal as-is.
//!
//! Rendering and reading both go through `chrono::format` items. Reading
//! fills whatever the pattern leaves out from a reference date (see
//! [`DatePattern::parse`]).
//!
//! ```rust
//! use chrono::NaiveDate;
//! use helper_kit::date_pattern::DatePattern;
//!
//! let pattern: DatePattern = "MMM d, yyyy 'at' h:mm a".parse().unwrap();
//! let when = NaiveDate::from_ymd_opt(2019, 10, 21).unwrap().and_hms_opt(15, 4, 0).unwrap();
//!
//! assert_eq!(pattern.format(&when).unwrap(), "Oct 21, 2019 at 3:04 PM");
//! assert_eq!(pattern.parse("oct 21, 2019 at 3:04 pm", when.date()).unwrap(), Some(when));
//! ```

use chrono::format::{self, Fixed, Item, Numeric, Pad, Parsed, StrftimeItems};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use smallvec::SmallVec;
use std::fmt::{self, Write};
use std::str::FromStr;

const MONTH_INITIALS: [&str; 12] = ["J", "F", "M", "A", "M", "J", "J", "A", "S", "O", "N", "D"];

/// Why a pattern cannot be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// An ASCII letter outside quotes that is not a known token.
    UnescapedLetter {
        /// The offending letter.
        letter: char,
        /// Character index in the pattern.
        position: usize,
    },
    /// A known letter repeated a number of times that has no meaning.
    UnsupportedToken {
        /// The full letter run, e.g. `"ddd"`.
        token: String,
    },
    /// A quoted literal that never closes.
    UnterminatedQuote {
        /// Character index of the opening quote.
        position: usize,
    },
    /// The pattern contains a token that can be rendered but not read back.
    FormatOnly {
        /// The token, e.g. `"EEEE"`.
        token: &'static str,
    },
    /// The date could not be rendered.
    Unrenderable,
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::UnescapedLetter { letter, position } => write!(
                f,
                "pattern contains an unescaped latin alphabet character `{letter}` at {position}"
            ),
            PatternError::UnsupportedToken { token } => {
                write!(f, "pattern token `{token}` is not supported")
            }
            PatternError::UnterminatedQuote { position } => {
                write!(f, "quoted text starting at {position} is never closed")
            }
            PatternError::FormatOnly { token } => {
                write!(f, "pattern token `{token}` can be formatted but not parsed")
            }
            PatternError::Unrenderable => f.write_str("date cannot be rendered with this pattern"),
        }
    }
}

impl std::error::Error for PatternError {}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Year { width: usize },
    YearTwoDigit,
    Quarter { width: usize },
    Month { padded: bool },
    MonthAbbrev,
    MonthName,
    MonthNarrow,
    Day { padded: bool },
    DayOrdinal,
    Hour { padded: bool },
    Hour12 { padded: bool },
    HourFromOne { padded: bool },
    HourToEleven { padded: bool },
    Minute { padded: bool },
    Second { padded: bool },
    Fraction { digits: usize },
    Meridiem { lowercase: bool },
    MeridiemDotted,
    MeridiemNarrow,
    WeekdayAbbrev,
    WeekdayName,
    WeekdayNarrow,
    WeekdayShort,
    LocalizedDate { width: usize },
}

impl Token {
    fn from_run(letter: char, count: usize, position: usize) -> Result<Token, PatternError> {
        let padded = count == 2;
        let token = match (letter, count) {
            ('y', 2) => Token::YearTwoDigit,
            ('y', _) => Token::Year { width: count },
            ('Q', 1..=5) => Token::Quarter { width: count },
            ('M' | 'L', 1 | 2) => Token::Month { padded },
            ('M' | 'L', 3) => Token::MonthAbbrev,
            ('M' | 'L', 4) => Token::MonthName,
            ('M' | 'L', 5) => Token::MonthNarrow,
            ('d', 1 | 2) => Token::Day { padded },
            ('H', 1 | 2) => Token::Hour { padded },
            ('h', 1 | 2) => Token::Hour12 { padded },
            ('k', 1 | 2) => Token::HourFromOne { padded },
            ('K', 1 | 2) => Token::HourToEleven { padded },
            ('m', 1 | 2) => Token::Minute { padded },
            ('s', 1 | 2) => Token::Second { padded },
            ('S', _) => Token::Fraction { digits: count },
            ('a', 1 | 2) => Token::Meridiem { lowercase: false },
            ('a', 3) => Token::Meridiem { lowercase: true },
            ('a', 4) => Token::MeridiemDotted,
            ('a', 5) => Token::MeridiemNarrow,
            ('E', 1..=3) => Token::WeekdayAbbrev,
            ('E', 4) => Token::WeekdayName,
            ('E', 5) => Token::WeekdayNarrow,
            ('E', 6) => Token::WeekdayShort,
            ('P', 1..=4) => Token::LocalizedDate { width: count },
            ('Q' | 'M' | 'L' | 'd' | 'H' | 'h' | 'k' | 'K' | 'm' | 's' | 'a' | 'E' | 'P', _) => {
                return Err(PatternError::UnsupportedToken {
                    token: std::iter::repeat_n(letter, count).collect(),
                });
            }
            _ => return Err(PatternError::UnescapedLetter { letter, position }),
        };
        Ok(token)
    }

    fn push_format_item<'a>(&'a self, value: &NaiveDateTime, items: &mut Vec<Item<'a>>) {
        let pad = |padded: bool| if padded { Pad::Zero } else { Pad::None };
        let text = |text: String| Item::OwnedLiteral(text.into_boxed_str());

        let item = match self {
            Token::Literal(literal) => Item::Literal(literal.as_str()),
            Token::Year { width: 1 } => Item::Numeric(Numeric::Year, Pad::None),
            Token::Year { width: 4 } => Item::Numeric(Numeric::Year, Pad::Zero),
            Token::Year { width } => text(format!("{:0width$}", value.year(), width = *width)),
            Token::YearTwoDigit => Item::Numeric(Numeric::YearMod100, Pad::Zero),
            Token::Quarter { width: 1 | 5 } => Item::Numeric(Numeric::Quarter, Pad::None),
            Token::Quarter { width } => {
                let quarter = value.month0() / 3 + 1;
                match *width {
                    2 => text(format!("{quarter:02}")),
                    3 => text(format!("Q{quarter}")),
                    _ => text(format!("{} quarter", ordinal(quarter))),
                }
            }
            Token::Month { padded } => Item::Numeric(Numeric::Month, pad(*padded)),
            Token::MonthAbbrev => Item::Fixed(Fixed::ShortMonthName),
            Token::MonthName => Item::Fixed(Fixed::LongMonthName),
            Token::MonthNarrow => Item::Literal(MONTH_INITIALS[value.month0() as usize]),
            Token::Day { padded } => Item::Numeric(Numeric::Day, pad(*padded)),
            Token::DayOrdinal => text(ordinal(value.day())),
            Token::Hour { padded } => Item::Numeric(Numeric::Hour, pad(*padded)),
            Token::Hour12 { padded } => Item::Numeric(Numeric::Hour12, pad(*padded)),
            Token::HourFromOne { padded } => {
                let hour = if value.hour() == 0 { 24 } else { value.hour() };
                text(two_digits(hour, *padded))
            }
            Token::HourToEleven { padded } => text(two_digits(value.hour() % 12, *padded)),
            Token::Minute { padded } => Item::Numeric(Numeric::Minute, pad(*padded)),
            Token::Second { padded } => Item::Numeric(Numeric::Second, pad(*padded)),
            Token::Fraction { digits } => text(fraction(value.nanosecond(), *digits)),
            Token::Meridiem { lowercase: false } => Item::Fixed(Fixed::UpperAmPm),
            Token::Meridiem { lowercase: true } => Item::Fixed(Fixed::LowerAmPm),
            Token::MeridiemDotted => Item::Literal(if value.hour() < 12 { "a.m." } else { "p.m." }),
            Token::MeridiemNarrow => Item::Literal(if value.hour() < 12 { "a" } else { "p" }),
            Token::WeekdayAbbrev => Item::Fixed(Fixed::ShortWeekdayName),
            Token::WeekdayName => Item::Fixed(Fixed::LongWeekdayName),
            Token::WeekdayNarrow => text(value.weekday().to_string().chars().take(1).collect()),
            Token::WeekdayShort => text(value.weekday().to_string().chars().take(2).collect()),
            Token::LocalizedDate { width } => text(localized_date(value, *width)),
        };
        items.push(item);
    }

    /// The chrono item that reads this token, or the token's name when it
    /// can only be rendered.
    fn parse_item(&self) -> Result<Item<'_>, &'static str> {
        let item = match self {
            Token::Literal(literal) => Item::Literal(literal.as_str()),
            Token::Year { .. } => Item::Numeric(Numeric::Year, Pad::None),
            Token::YearTwoDigit => Item::Numeric(Numeric::YearMod100, Pad::None),
            Token::Month { .. } => Item::Numeric(Numeric::Month, Pad::None),
            Token::MonthAbbrev => Item::Fixed(Fixed::ShortMonthName),
            // Accepts the abbreviation too
            Token::MonthName => Item::Fixed(Fixed::LongMonthName),
            Token::Day { .. } => Item::Numeric(Numeric::Day, Pad::None),
            Token::Hour { .. } => Item::Numeric(Numeric::Hour, Pad::None),
            Token::Hour12 { .. } => Item::Numeric(Numeric::Hour12, Pad::None),
            Token::Minute { .. } => Item::Numeric(Numeric::Minute, Pad::None),
            Token::Second { .. } => Item::Numeric(Numeric::Second, Pad::None),
            Token::Fraction { digits: 3 } => StrftimeItems::new("%3f").next().ok_or("SSS")?,
            Token::Meridiem { .. } => Item::Fixed(Fixed::UpperAmPm),
            Token::Fraction { .. } => return Err("S"),
            Token::Quarter { .. } => return Err("Q"),
            Token::MonthNarrow => return Err("MMMMM"),
            Token::DayOrdinal => return Err("do"),
            Token::HourFromOne { .. } => return Err("k"),
            Token::HourToEleven { .. } => return Err("K"),
            Token::MeridiemDotted => return Err("aaaa"),
            Token::MeridiemNarrow => return Err("aaaaa"),
            Token::WeekdayAbbrev => return Err("EEE"),
            Token::WeekdayName => return Err("EEEE"),
            Token::WeekdayNarrow => return Err("EEEEE"),
            Token::WeekdayShort => return Err("EEEEEE"),
            Token::LocalizedDate { .. } => return Err("P"),
        };
        Ok(item)
    }
}

/// A compiled date pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePattern {
    source: String,
    tokens: SmallVec<[Token; 8]>,
}

impl DatePattern {
    /// Tokenize `pattern`.
    ///
    /// # Errors
    ///
    /// Fails on unknown unescaped letters, unsupported letter runs and
    /// unterminated quotes.
    pub fn compile(pattern: &str) -> Result<DatePattern, PatternError> {
        let chars: Vec<char> = pattern.chars().collect();
        let mut tokens: SmallVec<[Token; 8]> = SmallVec::new();
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];

            if c == '\'' {
                if chars.get(i + 1) == Some(&'\'') {
                    push_literal(&mut tokens, '\'');
                    i += 2;
                    continue;
                }

                let start = i;
                i += 1;
                loop {
                    match chars.get(i) {
                        None => return Err(PatternError::UnterminatedQuote { position: start }),
                        Some('\'') if chars.get(i + 1) == Some(&'\'') => {
                            push_literal(&mut tokens, '\'');
                            i += 2;
                        }
                        Some('\'') => {
                            i += 1;
                            break;
                        }
                        Some(&other) => {
                            push_literal(&mut tokens, other);
                            i += 1;
                        }
                    }
                }
            } else if c == 'd' && chars.get(i + 1) == Some(&'o') {
                tokens.push(Token::DayOrdinal);
                i += 2;
            } else if c.is_ascii_alphabetic() {
                let count = chars[i..].iter().take_while(|&&next| next == c).count();
                tokens.push(Token::from_run(c, count, i)?);
                i += count;
            } else {
                push_literal(&mut tokens, c);
                i += 1;
            }
        }

        Ok(DatePattern {
            source: pattern.to_owned(),
            tokens,
        })
    }

    /// The pattern text this was compiled from.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether every token can be read back by [`DatePattern::parse`].
    pub fn is_parseable(&self) -> bool {
        self.tokens.iter().all(|token| token.parse_item().is_ok())
    }

    /// Render `value`.
    pub fn format(&self, value: &NaiveDateTime) -> Result<String, PatternError> {
        let mut items = Vec::with_capacity(self.tokens.len());
        for token in &self.tokens {
            token.push_format_item(value, &mut items);
        }

        let mut out = String::new();
        write!(out, "{}", value.format_with_items(items.iter()))
            .map_err(|_| PatternError::Unrenderable)?;
        Ok(out)
    }

    /// Read a date from `input`.
    ///
    /// The whole input must be consumed; trailing whitespace is allowed.
    /// Date components the pattern omits come from `reference` (the day is
    /// clamped to the parsed month's length); time components it omits are
    /// zero. Returns `Ok(None)` when the input does not match or names an
    /// impossible date.
    ///
    /// # Errors
    ///
    /// Fails when the pattern contains a format-only token.
    pub fn parse(&self, input: &str, reference: NaiveDate) -> Result<Option<NaiveDateTime>, PatternError> {
        let items = self
            .tokens
            .iter()
            .map(Token::parse_item)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|token| PatternError::FormatOnly { token })?;

        let mut parsed = Parsed::new();
        if format::parse(&mut parsed, input.trim_end(), items.iter()).is_err() {
            return Ok(None);
        }
        Ok(resolve(&parsed, reference))
    }
}

impl FromStr for DatePattern {
    type Err = PatternError;

    fn from_str(pattern: &str) -> Result<Self, Self::Err> {
        DatePattern::compile(pattern)
    }
}

impl fmt::Display for DatePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn push_literal(tokens: &mut SmallVec<[Token; 8]>, c: char) {
    if let Some(Token::Literal(text)) = tokens.last_mut() {
        text.push(c);
    } else {
        tokens.push(Token::Literal(c.to_string()));
    }
}

/// Complete the parsed fields from `reference` and validate the result.
fn resolve(parsed: &Parsed, reference: NaiveDate) -> Option<NaiveDateTime> {
    let year = match (parsed.year(), parsed.year_mod_100()) {
        (Some(year), _) => year,
        (None, Some(two_digits)) => resolve_two_digit_year(two_digits, reference.year()),
        (None, None) => reference.year(),
    };
    let month = parsed.month().unwrap_or_else(|| reference.month());
    let day = match parsed.day() {
        Some(day) => day,
        None => reference.day().min(last_day_of_month(year, month)?),
    };

    // A 12-hour reading without a meridiem counts as AM
    let hour = parsed.hour_div_12().unwrap_or(0) * 12 + parsed.hour_mod_12().unwrap_or(0);

    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_nano_opt(
        hour,
        parsed.minute().unwrap_or(0),
        parsed.second().unwrap_or(0),
        parsed.nanosecond().unwrap_or(0),
    )
}

/// Place a two-digit year in the century that keeps it within 50 years of
/// `reference_year`.
pub(crate) fn resolve_two_digit_year(two_digits: i32, reference_year: i32) -> i32 {
    let range_end = reference_year + 50;
    let century = range_end.div_euclid(100) * 100;
    if two_digits >= range_end.rem_euclid(100) {
        two_digits + century - 100
    } else {
        two_digits + century
    }
}

pub(crate) fn last_day_of_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?
        .pred_opt()
        .map(|last| last.day())
}

fn two_digits(value: u32, padded: bool) -> String {
    if padded {
        format!("{value:02}")
    } else {
        value.to_string()
    }
}

/// Leading `digits` of the fractional second, zero-extended past nanoseconds.
fn fraction(nanosecond: u32, digits: usize) -> String {
    let mut text = format!("{:09}", nanosecond % 1_000_000_000);
    if digits <= text.len() {
        text.truncate(digits);
    } else {
        text.extend(std::iter::repeat_n('0', digits - text.len()));
    }
    text
}

/// US-English long date forms, shortest first.
fn localized_date(value: &NaiveDateTime, width: usize) -> String {
    let day = ordinal(value.day());
    match width {
        1 => value.format("%m/%d/%Y").to_string(),
        2 => value.format("%b %-d, %Y").to_string(),
        3 => format!("{} {day}, {}", value.format("%B"), value.year()),
        _ => format!("{}, {} {day}, {}", value.format("%A"), value.format("%B"), value.year()),
    }
}

fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}
