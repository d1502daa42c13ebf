//! Terminal output formatting

use crate::cert_ops::CertificateChain;
use console::style;

/// Print a section header
pub fn print_header(title: &str) {
    println!();
    println!("{}", style(format!("━━━ {} ━━━", title)).cyan().bold());
    println!();
}

/// Print the chain as it will be packaged
pub fn print_chain_summary(chain: &CertificateChain) {
    print_header("Certificate Chain");

    for (i, (role, cert)) in chain.roles().enumerate() {
        let name = cert.subject_cn().unwrap_or(&cert.subject);
        println!(
            "  {} {} {}",
            style(format!("[{}]", i)).dim(),
            style(format!("{:<12}", role.to_string())).bold(),
            name
        );
        println!("      {} {}", style("Issuer: ").dim(), cert.issuer);
        println!("      {} {}", style("Serial: ").dim(), cert.serial);
        println!(
            "      {} {} to {}",
            style("Valid:  ").dim(),
            cert.not_before.format("%Y-%m-%d"),
            cert.not_after.format("%Y-%m-%d")
        );
        println!("      {} {}", style("SHA-256:").dim(), cert.fingerprint);
    }
    println!();
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an error message.
///
/// Errors share stdout with every other message.
pub fn print_error(message: &str) {
    println!("{} {}", style("✗").red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", style("!").yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", style("ℹ").blue(), message);
}
