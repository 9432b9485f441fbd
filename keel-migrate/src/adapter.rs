//! Adapter resolution.
//!
//! Decides, from configuration alone, whether the engine applies changes itself
//! or hands control to an external migration tool. Resolution is pure: it never
//! opens a connection or spawns anything.

use serde::Deserialize;

use crate::error::{MigrateResult, MigrationError};

/// Storage settings as written in configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    /// Backend kind (`sqlite`, `prisma`, `drizzle`, ...).
    pub adapter: Option<String>,
    /// Connection URL or file path for native backends.
    pub url: Option<String>,
}

impl AdapterConfig {
    /// Create a config for the given backend kind.
    pub fn new(adapter: impl Into<String>) -> Self {
        Self {
            adapter: Some(adapter.into()),
            url: None,
        }
    }

    /// Set the connection URL.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Whether the configured backend connects through `url` itself.
    pub fn takes_url(&self) -> bool {
        self.adapter
            .as_deref()
            .is_some_and(|a| a.trim().eq_ignore_ascii_case("sqlite"))
    }
}

/// Identifier of a recognized, migratable backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterId {
    Sqlite,
    Prisma,
    Drizzle,
}

impl std::fmt::Display for AdapterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdapterId::Sqlite => write!(f, "sqlite"),
            AdapterId::Prisma => write!(f, "prisma"),
            AdapterId::Drizzle => write!(f, "drizzle"),
        }
    }
}

/// SQL dialect of a native store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Sqlite,
}

/// Where a native store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeTarget {
    /// SQL dialect.
    pub dialect: Dialect,
    /// Database path or URL, as configured.
    pub url: String,
}

/// An external migration tool invoked as a subprocess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegateTool {
    /// Tool name shown to the operator.
    pub name: &'static str,
    /// Program to spawn.
    pub command: &'static str,
    /// Arguments passed verbatim.
    pub args: &'static [&'static str],
    /// Subcommand as described to the operator.
    pub action: &'static str,
    /// Whether declining the prompt ends the run as a failure.
    pub decline_is_failure: bool,
}

impl DelegateTool {
    /// The yes/no question asked before running the tool.
    pub fn question(&self) -> String {
        format!("Do you want to run {} {}?", self.name, self.action)
    }

    /// The full command line, for display.
    pub fn command_line(&self) -> String {
        std::iter::once(self.command)
            .chain(self.args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// `npx prisma migrate dev`
pub const PRISMA: DelegateTool = DelegateTool {
    name: "prisma",
    command: "npx",
    args: &["prisma", "migrate", "dev"],
    action: "migrate dev",
    decline_is_failure: false,
};

/// `npx drizzle-kit migrate`
pub const DRIZZLE: DelegateTool = DelegateTool {
    name: "drizzle",
    command: "npx",
    args: &["drizzle-kit", "migrate"],
    action: "migrate",
    decline_is_failure: true,
};

/// How changes reach the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capability {
    /// The engine introspects, plans, and applies DDL itself.
    Native(NativeTarget),
    /// An external tool owns diffing and applying.
    Delegate(DelegateTool),
}

/// The resolved backend for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterDescriptor {
    /// Backend identifier.
    pub id: AdapterId,
    /// Migration capability.
    pub capability: Capability,
}

impl AdapterDescriptor {
    /// Whether the engine applies changes itself.
    pub fn is_native(&self) -> bool {
        matches!(self.capability, Capability::Native(_))
    }
}

/// Backends that exist but cannot be migrated.
const NON_MIGRATABLE: &[&str] = &["mongodb", "memory"];

/// Resolve the configured backend into a capability descriptor.
pub fn resolve(config: &AdapterConfig) -> MigrateResult<AdapterDescriptor> {
    let kind = config
        .adapter
        .as_deref()
        .map(|a| a.trim().to_ascii_lowercase())
        .filter(|a| !a.is_empty())
        .ok_or_else(|| MigrationError::invalid_configuration("no database adapter configured"))?;

    let url = config
        .url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty());

    let (id, capability) = match kind.as_str() {
        "sqlite" => {
            let url = url.ok_or_else(|| {
                MigrationError::invalid_configuration("the sqlite adapter requires a `url`")
            })?;
            (
                AdapterId::Sqlite,
                Capability::Native(NativeTarget {
                    dialect: Dialect::Sqlite,
                    url: url.to_string(),
                }),
            )
        }
        "prisma" => (AdapterId::Prisma, Capability::Delegate(PRISMA)),
        "drizzle" => (AdapterId::Drizzle, Capability::Delegate(DRIZZLE)),
        other if NON_MIGRATABLE.contains(&other) => {
            return Err(MigrationError::NonMigratableAdapter(other.to_string()));
        }
        other => return Err(MigrationError::UnsupportedAdapter(other.to_string())),
    };

    if let Capability::Delegate(tool) = &capability {
        if url.is_some() {
            return Err(MigrationError::invalid_configuration(format!(
                "the {} adapter manages its own connection; remove `url`",
                tool.name
            )));
        }
    }

    Ok(AdapterDescriptor { id, capability })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sqlite_is_native() {
        let descriptor = resolve(&AdapterConfig::new("sqlite").url("./app.db")).unwrap();

        assert_eq!(descriptor.id, AdapterId::Sqlite);
        assert!(descriptor.is_native());
        assert_eq!(
            descriptor.capability,
            Capability::Native(NativeTarget {
                dialect: Dialect::Sqlite,
                url: "./app.db".to_string(),
            })
        );
    }

    #[test]
    fn test_delegate_argument_vectors() {
        let prisma = resolve(&AdapterConfig::new("prisma")).unwrap();
        let drizzle = resolve(&AdapterConfig::new("Drizzle ")).unwrap();

        match (prisma.capability, drizzle.capability) {
            (Capability::Delegate(p), Capability::Delegate(d)) => {
                assert_eq!(p.command_line(), "npx prisma migrate dev");
                assert_eq!(d.command_line(), "npx drizzle-kit migrate");
                assert!(!p.decline_is_failure);
                assert!(d.decline_is_failure);
            }
            other => panic!("expected delegates, got {:?}", other),
        }
    }

    #[test]
    fn test_delegate_questions() {
        assert_eq!(PRISMA.question(), "Do you want to run prisma migrate dev?");
        assert_eq!(DRIZZLE.question(), "Do you want to run drizzle migrate?");
    }

    #[test]
    fn test_missing_adapter_is_invalid() {
        let err = resolve(&AdapterConfig::default()).unwrap_err();
        assert!(matches!(err, MigrationError::InvalidConfiguration(_)));

        let err = resolve(&AdapterConfig::new("  ")).unwrap_err();
        assert!(matches!(err, MigrationError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_sqlite_without_url_is_invalid() {
        let err = resolve(&AdapterConfig::new("sqlite")).unwrap_err();
        assert!(matches!(err, MigrationError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_delegate_with_url_is_contradictory() {
        let err = resolve(&AdapterConfig::new("prisma").url("postgres://localhost/app")).unwrap_err();
        assert!(matches!(err, MigrationError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_unknown_and_non_migratable() {
        let err = resolve(&AdapterConfig::new("cassandra")).unwrap_err();
        assert!(matches!(err, MigrationError::UnsupportedAdapter(ref k) if k == "cassandra"));

        let err = resolve(&AdapterConfig::new("mongodb")).unwrap_err();
        assert!(matches!(err, MigrationError::NonMigratableAdapter(ref k) if k == "mongodb"));
    }

    #[test]
    fn test_takes_url() {
        assert!(AdapterConfig::new(" SQLite ").takes_url());
        assert!(!AdapterConfig::new("prisma").takes_url());
        assert!(!AdapterConfig::default().takes_url());
    }
}
