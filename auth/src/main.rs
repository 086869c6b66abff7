//! Admin Auth CLI
//!
//! Answers permission questions about users defined in a fixture file.

use std::io::Write;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use admin_auth::config::Config;
use admin_auth::fixtures::Fixtures;
use admin_auth::{HasPermissions, RoleRef};

#[derive(Parser)]
#[command(name = "admin-authz")]
#[command(about = "Resolve admin panel roles and permissions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a user has a permission (exit code 1 when denied)
    Can {
        #[arg(value_name = "USERNAME")]
        user: String,

        #[arg(value_name = "PERMISSION")]
        permission: String,
    },
    /// List the roles a user holds
    Roles {
        #[arg(value_name = "USERNAME")]
        user: String,
    },
    /// List a user's effective permissions
    Permissions {
        #[arg(value_name = "USERNAME")]
        user: String,
    },
    /// Check whether an element restricted to roles is visible to a user
    Visible {
        #[arg(value_name = "USERNAME")]
        user: String,

        /// Role allowed to see the element (repeatable; none means unrestricted)
        #[arg(long = "role", value_name = "SLUG")]
        roles: Vec<String>,
    },
    /// List all users in the fixture file
    Users,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    init_tracing(&config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        fixtures = %config.fixtures_path.display(),
        "Starting admin-authz"
    );

    let fixtures = Fixtures::from_path(&config.fixtures_path).with_context(|| {
        format!(
            "failed to load fixtures from {}",
            config.fixtures_path.display()
        )
    })?;

    let succeeded = run(&fixtures, cli.command, &mut std::io::stdout().lock())?;
    Ok(exit_code(succeeded))
}

fn init_tracing(config: &Config) {
    // stdout is reserved for command output
    let builder = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.as_str().into()),
        )
        .with_writer(std::io::stderr);

    if config.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Execute a command, writing its output to `out`.
///
/// Returns `false` when a check is denied or the element is hidden.
fn run<W: Write>(fixtures: &Fixtures, command: Commands, out: &mut W) -> Result<bool> {
    match command {
        Commands::Can { user, permission } => {
            let user = fixtures.user(&user)?;
            let allowed = user.can(&permission);
            info!(user = %user.username, %permission, allowed, "Permission check");
            writeln!(out, "{}", if allowed { "allow" } else { "deny" })?;
            Ok(allowed)
        }
        Commands::Roles { user } => {
            let user = fixtures.user(&user)?;
            let mut slugs: Vec<&str> = user.roles.iter().map(|r| r.slug.as_str()).collect();
            slugs.sort_unstable();
            slugs.dedup();
            for slug in slugs {
                writeln!(out, "{slug}")?;
            }
            Ok(true)
        }
        Commands::Permissions { user } => {
            let user = fixtures.user(&user)?;
            if user.is_administrator() {
                info!(user = %user.username, "Administrator passes every permission check");
            }
            let mut slugs: Vec<String> =
                user.all_permissions().into_iter().map(|p| p.slug).collect();
            slugs.sort_unstable();
            for slug in slugs {
                writeln!(out, "{slug}")?;
            }
            Ok(true)
        }
        Commands::Visible { user, roles } => {
            let user = fixtures.user(&user)?;
            let roles: Vec<RoleRef> = roles.into_iter().map(RoleRef::new).collect();
            let visible = user.visible(&roles);
            writeln!(out, "{}", if visible { "visible" } else { "hidden" })?;
            Ok(visible)
        }
        Commands::Users => {
            for name in fixtures.usernames() {
                writeln!(out, "{name}")?;
            }
            Ok(true)
        }
    }
}

const fn exit_code(succeeded: bool) -> ExitCode {
    if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use admin_auth::fixtures::FixtureError;

    const DOCUMENT: &str = r#"{
        "permissions": [
            { "slug": "post.edit", "name": "Edit posts" },
            { "slug": "comment.delete", "name": "Delete comments" }
        ],
        "roles": [
            { "slug": "administrator", "name": "Administrator" },
            { "slug": "editor", "name": "Editor", "permissions": ["post.edit"] },
            { "slug": "viewer", "name": "Viewer" }
        ],
        "users": [
            { "username": "root", "name": "Root", "roles": ["administrator"] },
            { "username": "alice", "name": "Alice", "roles": ["editor"], "permissions": ["comment.delete"] },
            { "username": "vera", "name": "Vera", "roles": ["viewer"] }
        ]
    }"#;

    fn fixtures() -> Fixtures {
        Fixtures::from_json(DOCUMENT).unwrap()
    }

    fn run_captured(command: Commands) -> Result<(bool, String)> {
        let mut out = Vec::new();
        let succeeded = run(&fixtures(), command, &mut out)?;
        Ok((succeeded, String::from_utf8(out).unwrap()))
    }

    fn can(user: &str, permission: &str) -> Commands {
        Commands::Can {
            user: user.into(),
            permission: permission.into(),
        }
    }

    fn visible(user: &str, roles: &[&str]) -> Commands {
        Commands::Visible {
            user: user.into(),
            roles: roles.iter().map(|r| (*r).to_string()).collect(),
        }
    }

    #[test]
    fn test_can_allowed_and_denied() {
        let (allowed, output) = run_captured(can("alice", "post.edit")).unwrap();
        assert!(allowed);
        assert_eq!(output, "allow\n");

        let (allowed, output) = run_captured(can("alice", "comment.delete")).unwrap();
        assert!(allowed);
        assert_eq!(output, "allow\n");

        let (allowed, output) = run_captured(can("alice", "post.delete")).unwrap();
        assert!(!allowed);
        assert_eq!(output, "deny\n");
    }

    #[test]
    fn test_can_administrator_override() {
        let (allowed, _) = run_captured(can("root", "anything.random")).unwrap();
        assert!(allowed);
    }

    #[test]
    fn test_visible_without_roles_is_unrestricted() {
        for user in ["root", "alice", "vera"] {
            let (shown, output) = run_captured(visible(user, &[])).unwrap();
            assert!(shown, "{user} should see an unrestricted element");
            assert_eq!(output, "visible\n");
        }
    }

    #[test]
    fn test_visible_with_roles() {
        let (shown, output) = run_captured(visible("vera", &["editor"])).unwrap();
        assert!(!shown);
        assert_eq!(output, "hidden\n");

        let (shown, _) = run_captured(visible("vera", &["editor", "viewer"])).unwrap();
        assert!(shown);

        let (shown, _) = run_captured(visible("root", &["editor"])).unwrap();
        assert!(shown);
    }

    #[test]
    fn test_listing_commands() {
        let (ok, output) = run_captured(Commands::Roles { user: "alice".into() }).unwrap();
        assert!(ok);
        assert_eq!(output, "editor\n");

        let (ok, output) = run_captured(Commands::Permissions { user: "alice".into() }).unwrap();
        assert!(ok);
        assert_eq!(output, "comment.delete\npost.edit\n");

        let (ok, output) = run_captured(Commands::Users).unwrap();
        assert!(ok);
        assert_eq!(output, "alice\nroot\nvera\n");
    }

    #[test]
    fn test_unknown_user_propagates_error() {
        let err = run_captured(can("mallory", "post.edit")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FixtureError>(),
            Some(FixtureError::UnknownUser(name)) if name == "mallory"
        ));

        assert!(run_captured(visible("mallory", &[])).is_err());
    }

    #[test]
    fn test_exit_code_mapping() {
        assert_eq!(format!("{:?}", exit_code(true)), format!("{:?}", ExitCode::SUCCESS));
        assert_eq!(format!("{:?}", exit_code(false)), format!("{:?}", ExitCode::FAILURE));
    }

    #[test]
    fn test_cli_parses_repeated_roles() {
        let cli = Cli::try_parse_from([
            "admin-authz", "visible", "vera", "--role", "editor", "--role", "viewer",
        ])
        .unwrap();
        match cli.command {
            Commands::Visible { user, roles } => {
                assert_eq!(user, "vera");
                assert_eq!(roles, vec!["editor", "viewer"]);
            }
            _ => panic!("expected visible command"),
        }

        let cli = Cli::try_parse_from(["admin-authz", "visible", "vera"]).unwrap();
        assert!(matches!(cli.command, Commands::Visible { roles, .. } if roles.is_empty()));
    }

    #[test]
    fn test_help_and_version_need_no_configuration() {
        let help = Cli::try_parse_from(["admin-authz", "--help"]).err().unwrap();
        assert_eq!(help.kind(), clap::error::ErrorKind::DisplayHelp);

        let version = Cli::try_parse_from(["admin-authz", "--version"]).err().unwrap();
        assert_eq!(version.kind(), clap::error::ErrorKind::DisplayVersion);
    }
}
