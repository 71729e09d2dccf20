use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress over the rows of one worksheet upload; hidden unless `tui` is set.
pub fn upload_progress(len: usize, title: &str, tui: bool) -> crate::Result<ProgressBar> {
    if !tui {
        return Ok(ProgressBar::hidden());
    }

    let pb = ProgressBar::new(len as u64).with_style(
        ProgressStyle::default_bar()
            .template(
                "{msg} {spinner:.magenta}\n\
                [{elapsed_precise:.magenta}] |{bar:40.cyan/blue}| Processing line {pos} / {len} \
                [ETA: {eta:.blue}]",
            )?
            .progress_chars("##-"),
    );
    pb.set_message(format!("updating the {title} worksheet ..."));
    pb.enable_steady_tick(Duration::from_millis(100));

    Ok(pb)
}

/// Spinner shown while a tearsheet page is fetched & parsed.
pub fn fetch_spinner(msg: String, tui: bool) -> crate::Result<ProgressBar> {
    if !tui {
        return Ok(ProgressBar::hidden());
    }

    let pb = ProgressBar::new_spinner()
        .with_message(msg)
        .with_style(ProgressStyle::default_spinner().template("\t   > {msg} {spinner:.magenta}")?);
    pb.enable_steady_tick(Duration::from_millis(100));

    Ok(pb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_progress_counts_lines() {
        let pb = upload_progress(3, "BalanceSheet", true).unwrap();
        assert_eq!(pb.length(), Some(3));
        assert_eq!(pb.message(), "updating the BalanceSheet worksheet ...");

        pb.inc(1);
        assert_eq!(pb.position(), 1);
        pb.finish_and_clear();
    }

    #[test]
    fn hidden_outside_tui() {
        assert!(upload_progress(3, "CashFlow", false).unwrap().is_hidden());
        assert!(fetch_spinner("fetching ...".to_string(), false)
            .unwrap()
            .is_hidden());
    }
}
