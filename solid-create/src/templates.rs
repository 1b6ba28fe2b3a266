use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Which family of project is being created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectKind {
    /// A SolidStart application.
    Start,
    /// A plain Solid + Vite project.
    Vanilla,
}

impl ProjectKind {
    pub fn from_start_flag(is_start: bool) -> Self {
        if is_start {
            ProjectKind::Start
        } else {
            ProjectKind::Vanilla
        }
    }

    /// Directory under `templates/` holding this kind's templates.
    pub fn dir(self) -> &'static str {
        match self {
            ProjectKind::Start => "start",
            ProjectKind::Vanilla => "vanilla",
        }
    }
}

/// Every template the CLI ships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Template {
    Basic,
    Ts,
}

const START_TEMPLATES: &[Template] = &[Template::Basic];
const VANILLA_TEMPLATES: &[Template] = &[Template::Ts];

impl Template {
    pub fn as_str(self) -> &'static str {
        match self {
            Template::Basic => "basic",
            Template::Ts => "ts",
        }
    }

    pub fn kind(self) -> ProjectKind {
        match self {
            Template::Basic => ProjectKind::Start,
            Template::Ts => ProjectKind::Vanilla,
        }
    }

    /// Embedded path prefix, e.g. `start/basic/`.
    pub fn embed_prefix(self) -> String {
        format!("{}/{}/", self.kind().dir(), self.as_str())
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Template {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        START_TEMPLATES
            .iter()
            .chain(VANILLA_TEMPLATES)
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::UnknownTemplate {
                name: s.to_string(),
                available: START_TEMPLATES
                    .iter()
                    .chain(VANILLA_TEMPLATES)
                    .map(|t| t.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

/// The fixed, ordered template set for a project kind.
pub fn templates_for(kind: ProjectKind) -> &'static [Template] {
    match kind {
        ProjectKind::Start => START_TEMPLATES,
        ProjectKind::Vanilla => VANILLA_TEMPLATES,
    }
}

/// [`templates_for`] keyed by the "is this a SolidStart project" answer.
pub fn templates_list(is_start: bool) -> &'static [Template] {
    templates_for(ProjectKind::from_start_flag(is_start))
}
