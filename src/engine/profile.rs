//! Portfolio profile document and its text renderings.
//!
//! The document follows the gitconnected portfolio schema. Every field is
//! optional on input; missing sections render as empty text.

use crate::error::Result;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Profile {
    pub basics: Basics,
    pub skills: Vec<Skill>,
    pub work: Vec<Work>,
    pub publications: Vec<Publication>,
    pub projects: Vec<Project>,
    pub education: Vec<Education>,
    pub certificates: Vec<Certificate>,
    /// External links exposed as `VISIT.<KEY>`.
    pub links: BTreeMap<String, String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Basics {
    pub name: String,
    pub label: String,
    pub summary: String,
    pub profiles: Vec<SocialProfile>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SocialProfile {
    pub network: String,
    pub username: String,
    pub url: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Skill {
    pub name: String,
    pub rating: usize,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Work {
    pub position: String,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub website: String,
    pub summary: String,
    pub highlights: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Publication {
    pub name: String,
    pub url: String,
    pub summary: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    pub github_url: String,
    pub summary: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Education {
    pub institution: String,
    pub area: String,
    pub study_type: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Certificate {
    pub name: String,
    pub issuer: String,
}

impl Profile {
    /// Parse a JSON profile document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON profile document from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// The profile bundled with the crate.
    pub fn sample() -> Result<Self> {
        Self::from_json(include_str!("sample_profile.json"))
    }
}

/// Pre-loaded variables derived from a [`Profile`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProfileField {
    Name,
    About,
    Skills,
    Experience,
    ConferenceTalks,
    OpenSourceContributions,
    Education,
    Certifications,
}

impl ProfileField {
    pub const ALL: [Self; 8] = [
        Self::Name,
        Self::About,
        Self::Skills,
        Self::Experience,
        Self::ConferenceTalks,
        Self::OpenSourceContributions,
        Self::Education,
        Self::Certifications,
    ];

    /// Variable name as seen by the user.
    #[must_use]
    pub fn variable(self) -> &'static str {
        match self {
            Self::Name => "NAME",
            Self::About => "ABOUT",
            Self::Skills => "SKILLS",
            Self::Experience => "EXPERIENCE",
            Self::ConferenceTalks => "CONFERENCE_TALKS",
            Self::OpenSourceContributions => "OPEN_SOURCE_CONTRIBUTIONS",
            Self::Education => "EDUCATION",
            Self::Certifications => "CERTIFICATIONS",
        }
    }

    #[must_use]
    pub fn from_variable(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.variable() == name)
    }

    /// Render this field of `profile` as display text.
    #[must_use]
    pub fn render(self, profile: &Profile) -> String {
        let mut out = String::new();
        match self {
            Self::Name => out.push_str(&profile.basics.name),
            Self::About => {
                let b = &profile.basics;
                let _ = write!(out, "{} \n{} \n{}\n", b.name, b.label, b.summary);
                out.push_str("\nSocial Profiles: \n");
                for p in &b.profiles {
                    let _ = write!(out, "{}: {}\n{} \n\n", p.network, p.username, p.url);
                }
            }
            Self::Skills => {
                let lines: Vec<String> = profile
                    .skills
                    .iter()
                    .map(|s| format!("{} {}", s.name, "☆ ".repeat(s.rating)))
                    .collect();
                out = lines.join("\n");
            }
            Self::Experience => {
                for w in &profile.work {
                    let _ = write!(
                        out,
                        "\n{}\n{} at {}  | {} - {} | {} \n\n{} \n",
                        "-".repeat(30),
                        w.position,
                        w.name,
                        w.start_date,
                        w.end_date,
                        w.website,
                        w.summary
                    );
                    let highlights: Vec<String> =
                        w.highlights.iter().map(|h| format!("- {h}")).collect();
                    out.push_str(&highlights.join("\n"));
                    out.push_str("\n\n");
                }
            }
            Self::ConferenceTalks => {
                for t in &profile.publications {
                    let _ = write!(out, "\n{}\n{} \n{} \n", t.name, t.url, t.summary);
                }
            }
            Self::OpenSourceContributions => {
                for p in &profile.projects {
                    let _ = write!(out, "\n☆ {}\n{} \n{} \n", p.name, p.github_url, p.summary);
                }
            }
            Self::Education => {
                for e in &profile.education {
                    let _ = write!(
                        out,
                        "\n{} | {} | {} | {} - {} \n{} \n",
                        e.institution, e.area, e.study_type, e.start_date, e.end_date, e.description
                    );
                }
            }
            Self::Certifications => {
                for c in &profile.certificates {
                    let _ = write!(out, "\n{} | {} \n", c.name, c.issuer);
                }
            }
        }
        out
    }
}
