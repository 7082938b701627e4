use indicatif::{ProgressBar, ProgressStyle};

/// Returns a hidden bar counting the `n_steps` time steps of one
/// `action` over `what`.
///
/// The message slot shows the timestamp of the step being drawn.
pub fn steps(action: &str, what: &str, n_steps: usize) -> ProgressBar {
    let pb = ProgressBar::hidden();
    pb.set_prefix(format!("{action} {what}"));
    pb.set_length(n_steps as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{prefix} [{wide_bar:.cyan/blue}] {pos}/{len} steps {msg:.dim}",
        )
        .expect("incorrect progress bar format string")
        .progress_chars("#>-"),
    );
    pb
}

#[cfg(test)]
mod tests {
    use super::steps;

    #[test]
    fn test_steps() {
        let pb = steps("Animate", "FGRNHFX", 12);
        assert_eq!(pb.prefix(), "Animate FGRNHFX");
        assert_eq!(pb.length(), Some(12));
        assert_eq!(pb.position(), 0);
        assert!(pb.message().is_empty());
    }
}
