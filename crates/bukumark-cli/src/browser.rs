//! Opening bookmarks in a browser

use anyhow::{Context, Result};
use std::process::Command;
use tracing::debug;

/// Open `url` with the configured browser command, or the system opener
///
/// The browser is launched detached; its exit status is not awaited.
pub fn open_url(url: &str, browser: Option<&str>) -> Result<()> {
    match browser {
        Some(cmd) => {
            debug!(browser = cmd, url, "Launching browser");
            Command::new(cmd)
                .arg(url)
                .spawn()
                .with_context(|| format!("Failed to launch browser '{}'", cmd))?;
        }
        None => {
            debug!(url, "Opening with system handler");
            open::that_detached(url).context(
                "Failed to open URL: no system opener found. \
                 Set a browser with `bukumark config set browser <command>` \
                 or BUKUMARK_BROWSER",
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_browser_command_fails() {
        let err = open_url(
            "https://example.com",
            Some("definitely_not_a_real_browser_12345"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("definitely_not_a_real_browser_12345"));
    }

    #[cfg(unix)]
    #[test]
    fn test_browser_command_receives_url() {
        // `true` ignores its arguments and exits successfully
        open_url("https://example.com", Some("true")).unwrap();
    }
}
