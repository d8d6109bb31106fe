use indicatif::{ProgressBar, ProgressStyle};

const BAR_TEMPLATE: &str =
    "{msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})";
const SPINNER_TEMPLATE: &str = "{spinner} {msg} {bytes} ({bytes_per_sec})";
const UNKNOWN_SIZE: &str = "(Unknown total file size)";

/// How download progress is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchProgress {
    /// Draw a byte progress bar on stderr.
    #[default]
    Bar,
    /// Draw nothing.
    Hidden,
}

impl FetchProgress {
    /// Build an indicator sized to `content_length`.
    ///
    /// A missing or zero length yields a spinner labelled as unknown size.
    pub(crate) fn indicator(self, content_length: Option<u64>, file_name: &str) -> ProgressBar {
        if self == Self::Hidden {
            return ProgressBar::hidden();
        }
        content_length.filter(|length| *length > 0).map_or_else(
            || unknown_size_spinner(file_name),
            |length| sized_bar(length, file_name),
        )
    }
}

fn sized_bar(length: u64, file_name: &str) -> ProgressBar {
    let bar = ProgressBar::new(length);
    if let Ok(style) = ProgressStyle::with_template(BAR_TEMPLATE) {
        bar.set_style(style.progress_chars("=> "));
    }
    bar.set_message(file_name.to_owned());
    bar
}

fn unknown_size_spinner(file_name: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template(SPINNER_TEMPLATE) {
        spinner.set_style(style);
    }
    spinner.set_message(format!("{file_name} {UNKNOWN_SIZE}"));
    spinner
}
