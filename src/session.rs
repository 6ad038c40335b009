//! Session startup.

use crate::ansi;
use crate::config::ReplConfig;
use crate::engine::{Evaluator, SITE_DESCRIPTION_STRING, VERSION_STRING, wait_until_ready};
use crate::error::Result;
use crate::event::{LogLevel, emit_log};
use crate::router::InputRouter;
use crate::terminal::TerminalSurface;
use std::time::Duration;

/// Wait for the engine, print the banners, then show the first prompt with
/// the seed command already typed.
///
/// Returns how long the engine took to become ready.
///
/// # Errors
///
/// Returns [`crate::Error::ReadinessTimeout`] if the engine misses
/// `config.ready_timeout`, or an I/O error from the terminal.
pub fn start<S, E>(router: &mut InputRouter<S, E>, config: &ReplConfig) -> Result<Duration>
where
    S: TerminalSurface,
    E: Evaluator,
{
    let waited = wait_until_ready(router.engine(), config.ready_poll_interval, config.ready_timeout)?;
    emit_log(
        LogLevel::Info,
        &format!("evaluation engine ready after {}ms", waited.as_millis()),
    );

    let site = router.engine().lookup(SITE_DESCRIPTION_STRING).unwrap_or_default();
    let version = router.engine().lookup(VERSION_STRING).unwrap_or_default();

    let surface = router.surface_mut();
    surface.write(ansi::FG_BRIGHT_GREEN)?;
    surface.write(ansi::BOLD)?;
    surface.write(&ansi::normalize_newlines(&site))?;
    surface.write(ansi::RESET)?;
    surface.write(&ansi::normalize_newlines(&version))?;
    // The prompt redraw clears its line, so it must not share one with a banner
    let banner_end = if version.is_empty() { &site } else { &version };
    if !banner_end.is_empty() && !banner_end.ends_with('\n') {
        surface.write(ansi::CRLF)?;
    }

    let seed = config.seed_command.as_deref().unwrap_or_default();
    router.set_line(seed)?;
    Ok(waited)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, EvalError};
    use crate::mode::EventMode;
    use crate::terminal::Terminal;

    struct Banners {
        ready: bool,
        site: &'static str,
        version: &'static str,
    }

    impl Banners {
        fn ready() -> Self {
            Self {
                ready: true,
                site: "Site\n\n",
                version: "v1\n",
            }
        }
    }

    impl Evaluator for Banners {
        fn is_ready(&self) -> bool {
            self.ready
        }

        fn lookup(&self, name: &str) -> Option<String> {
            match name {
                SITE_DESCRIPTION_STRING => Some(self.site.to_string()),
                VERSION_STRING => Some(self.version.to_string()),
                _ => None,
            }
        }

        fn execute(&mut self, _command: &str) -> std::result::Result<String, EvalError> {
            Ok(String::new())
        }
    }

    #[test]
    fn test_start_writes_banners_and_seed() {
        let config = ReplConfig::default();
        let mut router = InputRouter::new(
            Terminal::new(Vec::new()),
            Banners::ready(),
            &config,
            EventMode::Key,
        );
        start(&mut router, &config).unwrap();
        let out = String::from_utf8_lossy(router.surface().writer()).into_owned();
        assert_eq!(
            out,
            "\x1b[92m\x1b[1mSite\r\n\r\n\x1b[0mv1\r\n\x1b[2K\r>>> print(ABOUT) # press enter"
        );
        assert_eq!(router.buffer().text(), "print(ABOUT) # press enter");
    }

    #[test]
    fn test_banners_without_trailing_newline_keep_their_line() {
        let config = ReplConfig::default();
        let banners = Banners {
            site: "Site",
            version: "v1",
            ..Banners::ready()
        };
        let mut router = InputRouter::new(Terminal::new(Vec::new()), banners, &config, EventMode::Key);
        start(&mut router, &config).unwrap();
        let out = String::from_utf8_lossy(router.surface().writer()).into_owned();
        assert_eq!(
            out,
            "\x1b[92m\x1b[1mSite\x1b[0mv1\r\n\x1b[2K\r>>> print(ABOUT) # press enter"
        );

        let banners = Banners {
            site: "Site",
            version: "",
            ..Banners::ready()
        };
        let mut router = InputRouter::new(Terminal::new(Vec::new()), banners, &config, EventMode::Key);
        start(&mut router, &config).unwrap();
        let out = String::from_utf8_lossy(router.surface().writer()).into_owned();
        assert!(out.starts_with("\x1b[92m\x1b[1mSite\x1b[0m\r\n\x1b[2K\r>>> "));
    }

    #[test]
    fn test_start_without_seed() {
        let config = ReplConfig::default().with_seed_command(None);
        let mut router = InputRouter::new(
            Terminal::new(Vec::new()),
            Banners::ready(),
            &config,
            EventMode::Key,
        );
        start(&mut router, &config).unwrap();
        assert!(router.buffer().is_empty());
        assert_eq!(router.surface().cursor_x(), 4);
    }

    #[test]
    fn test_start_times_out() {
        let config = ReplConfig {
            ready_poll_interval: Duration::from_millis(1),
            ready_timeout: Some(Duration::from_millis(5)),
            ..ReplConfig::default()
        };
        let mut router = InputRouter::new(
            Terminal::new(Vec::new()),
            Banners {
                ready: false,
                ..Banners::ready()
            },
            &config,
            EventMode::Key,
        );
        let err = start(&mut router, &config).unwrap_err();
        assert!(matches!(err, Error::ReadinessTimeout { .. }));
        assert!(router.surface().writer().is_empty());
    }
}
