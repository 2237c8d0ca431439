use helper_kit::colors::{self, ContentCandidates};

fn main() {
    println!("--- Contrast Example ---\n");

    let text = ContentCandidates {
        dark: "#000000",
        light: "#ffffff",
    };

    println!("{:<10} | {:<8} | {:>7} | {}", "Input", "Hex", "Score", "Text");
    println!("{:-<10}-|-{:-<8}-|-{:->7}-|-{:-<7}", "", "", "", "");

    for background in ["#17daa9", "#ffefc", "#b4b4b4", "#b3b3b3", "f1f", "", "#zzzzzz"] {
        let normalized = colors::normalize_hex_color(background);
        println!(
            "{:<10} | {:<8} | {:>7.2} | {}",
            background,
            normalized,
            colors::yiq_contrast_score(&normalized),
            colors::high_contrast_content_on_background_color(background, text)
        );
    }
}
