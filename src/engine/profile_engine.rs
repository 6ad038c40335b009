//! Evaluator over a portfolio profile.

use super::interp::{Interpreter, Value, help_listing};
use super::profile::{Profile, ProfileField};
use super::{Evaluator, ReadySignal, SITE_DESCRIPTION_STRING, VERSION_STRING};
use crate::error::{EvalError, Result};
use crate::event::{LogLevel, emit_log};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

/// Where a [`ProfileEngine`] gets its profile document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProfileSource {
    /// The document bundled with the crate.
    Sample,
    File(PathBuf),
    Json(String),
}

impl ProfileSource {
    fn read(&self) -> Result<Profile> {
        match self {
            Self::Sample => Profile::sample(),
            Self::File(path) => Profile::load(path),
            Self::Json(json) => Profile::from_json(json),
        }
    }
}

#[derive(Debug)]
struct Loaded {
    profile: Profile,
    /// Why the requested document could not be used, if it failed.
    error: Option<String>,
}

#[derive(Debug, Default)]
struct LoadState {
    loaded: OnceLock<Loaded>,
    signal: ReadySignal,
}

impl LoadState {
    fn finish(&self, loaded: Loaded) {
        let _ = self.loaded.set(loaded);
        self.signal.notify();
    }
}

/// Portfolio REPL engine.
///
/// Exposes the profile as pre-loaded string variables (`NAME`, `ABOUT`, ...)
/// and its links as `VISIT.<KEY>`, on top of the expression [`Interpreter`].
#[derive(Debug)]
pub struct ProfileEngine {
    state: Arc<LoadState>,
    interp: Option<Interpreter>,
}

impl ProfileEngine {
    /// An engine that is ready immediately.
    #[must_use]
    pub fn new(profile: Profile) -> Self {
        let state = LoadState::default();
        state.finish(Loaded {
            profile,
            error: None,
        });
        Self {
            state: Arc::new(state),
            interp: None,
        }
    }

    /// Load `source` synchronously.
    pub fn load(source: &ProfileSource) -> Result<Self> {
        Ok(Self::new(source.read()?))
    }

    /// Load `source` on a background thread; the engine reports ready once
    /// loading finishes.
    ///
    /// A document that fails to load leaves the engine ready with an empty
    /// profile, and the failure is shown in the site description.
    #[must_use]
    pub fn spawn(source: ProfileSource) -> Self {
        let state = Arc::new(LoadState::default());
        let loader = Arc::clone(&state);
        let spawned = std::thread::Builder::new()
            .name("profile-loader".to_string())
            .spawn(move || loader.finish(load_or_empty(&source)));

        if let Err(e) = spawned {
            emit_log(
                LogLevel::Warn,
                &format!("profile loader thread failed to start: {e}"),
            );
            state.finish(Loaded {
                profile: Profile::default(),
                error: Some(e.to_string()),
            });
        }
        Self {
            state,
            interp: None,
        }
    }

    /// The loaded profile, once ready.
    #[must_use]
    pub fn profile(&self) -> Option<&Profile> {
        self.state.loaded.get().map(|l| &l.profile)
    }

    fn interpreter(&mut self) -> Option<&mut Interpreter> {
        if self.interp.is_none() {
            let loaded = self.state.loaded.get()?;
            self.interp = Some(build_interpreter(&loaded.profile));
        }
        self.interp.as_mut()
    }
}

fn load_or_empty(source: &ProfileSource) -> Loaded {
    match source.read() {
        Ok(profile) => Loaded {
            profile,
            error: None,
        },
        Err(e) => {
            emit_log(LogLevel::Error, &format!("profile load failed: {e}"));
            Loaded {
                profile: Profile::default(),
                error: Some(e.to_string()),
            }
        }
    }
}

fn visit_names(profile: &Profile) -> Vec<String> {
    profile
        .links
        .keys()
        .map(|k| format!("VISIT.{}", k.to_uppercase()))
        .collect()
}

fn build_interpreter(profile: &Profile) -> Interpreter {
    let mut names: Vec<String> = ProfileField::ALL
        .iter()
        .map(|f| f.variable().to_string())
        .collect();
    names.extend(visit_names(profile));
    let help = help_listing("Pre-loaded variables:", names.iter().map(String::as_str));

    let mut interp = Interpreter::new().with_help(help);
    for field in ProfileField::ALL {
        interp.set(field.variable(), Value::Str(field.render(profile)));
    }
    let attrs = profile
        .links
        .iter()
        .map(|(k, url)| (k.to_uppercase(), Value::Str(url.clone())))
        .collect();
    interp.set(
        "VISIT",
        Value::Namespace {
            name: "ProfileLinks".to_string(),
            attrs,
        },
    );
    interp
}

fn join_alternatives(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} or {last}", init.join(", ")),
    }
}

fn site_description(loaded: &Loaded) -> String {
    let profile = &loaded.profile;
    let mut text = String::new();
    let title = if profile.basics.name.is_empty() {
        "Portfolio REPL".to_string()
    } else {
        format!("{} | Portfolio REPL", profile.basics.name)
    };
    let _ = write!(text, "{title}\n\n");

    let vars: Vec<&str> = ProfileField::ALL.iter().map(|f| f.variable()).collect();
    let _ = write!(text, "Pre-loaded variables: {}.\n\n", vars.join(", "));

    let links = visit_names(profile);
    if !links.is_empty() {
        let _ = write!(
            text,
            "External links: Enter {} to see where to find more.\n\n",
            join_alternatives(&links)
        );
    }
    if let Some(error) = &loaded.error {
        let _ = write!(text, "Profile unavailable: {error}\n\n");
    }
    text
}

fn version_banner() -> String {
    format!(
        "{} {} (profile engine)\nType \"help()\" for more information.\n",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    )
}

impl Evaluator for ProfileEngine {
    fn is_ready(&self) -> bool {
        self.state.loaded.get().is_some()
    }

    fn ready_signal(&self) -> Option<&ReadySignal> {
        Some(&self.state.signal)
    }

    fn lookup(&self, name: &str) -> Option<String> {
        let loaded = self.state.loaded.get()?;
        match name {
            VERSION_STRING => Some(version_banner()),
            SITE_DESCRIPTION_STRING => Some(site_description(loaded)),
            _ => {
                if let Some(value) = self.interp.as_ref().and_then(|i| i.get(name)) {
                    return Some(value.to_display());
                }
                ProfileField::from_variable(name).map(|f| f.render(&loaded.profile))
            }
        }
    }

    fn execute(&mut self, command: &str) -> std::result::Result<String, EvalError> {
        let Some(interp) = self.interpreter() else {
            return Err(EvalError::new(
                "RuntimeError",
                "evaluation engine is still starting",
            ));
        };
        let mut output = interp.execute(command)?;
        if output.ends_with('\n') {
            output.pop();
        }
        Ok(output)
    }
}
