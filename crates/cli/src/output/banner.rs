use colored::Colorize;

const LOGO: &[&str] = &[
    r"   ┏┳┓┏━┓┏┓╻╻╺┳╸┏━┓┏━┓",
    r"   ┃┃┃┃ ┃┃┗┫┃ ┃ ┃ ┃┣┳┛",
    r"   ╹ ╹┗━┛╹ ╹╹ ╹ ┗━┛╹┗╸",
    r"   ░ metric alert rules ░",
];

pub fn print_banner() {
    let colors = [
        colored::Color::Cyan,
        colored::Color::BrightCyan,
        colored::Color::Cyan,
        colored::Color::BrightWhite,
    ];

    for (line, &color) in LOGO.iter().zip(colors.iter()) {
        println!("{}", line.color(color).bold());
    }
}

pub fn print_version_block(version: &str, api_version: &str) {
    print_banner();
    println!();
    println!("  {} {}", "    Version".dimmed(), version.bright_cyan().bold());
    println!("  {} {}", "API version".dimmed(), api_version.bright_white());
    println!("  {} {}", "       Arch".dimmed(), std::env::consts::ARCH.bright_white());
    println!("  {} {}", "         OS".dimmed(), std::env::consts::OS.bright_white());
    println!();
}
