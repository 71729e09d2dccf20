use colored::Colorize;
use dialoguer::{Input, Password};

fn label(text: &str) -> String {
    format!("{} {}", text.bold(), "<Enter>".green())
}

/// Use the symbol given on the command line, or ask for one.
pub(crate) fn symbol(given: Option<String>) -> anyhow::Result<String> {
    let symbol = match given {
        Some(symbol) => symbol,
        None => Input::<String>::new()
            .with_prompt(label("Type Company Symbol (e.g: ORCL:NYQ) then press"))
            .interact_text()?,
    };

    let symbol = symbol.trim().to_string();
    anyhow::ensure!(!symbol.is_empty(), "company symbol cannot be empty");
    Ok(symbol)
}

/// Use the configured Google access token, or ask for one without echoing it.
pub(crate) fn access_token(configured: Option<String>) -> anyhow::Result<String> {
    match configured {
        Some(token) => Ok(token),
        None => Ok(Password::new()
            .with_prompt(label("Type Google access token then press"))
            .interact()?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_symbol_is_trimmed() {
        assert_eq!(symbol(Some(" ORCL:NYQ ".to_string())).unwrap(), "ORCL:NYQ");
    }

    #[test]
    fn blank_symbol_rejected() {
        assert!(symbol(Some("   ".to_string())).is_err());
    }

    #[test]
    fn configured_token_skips_prompt() {
        assert_eq!(access_token(Some("ya29.token".to_string())).unwrap(), "ya29.token");
    }
}
