use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, builder::BoolishValueParser};

/// Command-line arguments for the Lectern binary.
#[derive(Debug, Parser)]
#[command(name = "lectern", version, about = "Lectern blog server")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "LECTERN_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the blog HTTP service.
    Serve(Box<ServeArgs>),
    /// Apply pending database migrations and exit.
    Migrate(MigrateArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub database: DatabaseOverride,
}

#[derive(Debug, Args, Default, Clone)]
pub struct DatabaseOverride {
    /// Override the database connection URL.
    #[arg(long = "database-url", value_name = "URL")]
    pub database_url: Option<String>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,
    /// Override the listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,
    /// Override the graceful shutdown timeout.
    #[arg(long = "server-graceful-shutdown-seconds", value_name = "SECONDS")]
    pub server_graceful_shutdown_seconds: Option<u64>,
    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,
    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,
    /// Override the database connection URL.
    #[arg(long = "database-url", value_name = "URL")]
    pub database_url: Option<String>,
    /// Override the database pool size.
    #[arg(long = "database-max-connections", value_name = "COUNT")]
    pub database_max_connections: Option<u32>,
    /// Override the path the blog is mounted under.
    #[arg(long = "blog-path", value_name = "PATH")]
    pub blog_path: Option<String>,
    /// Override the number of posts shown per listing page.
    #[arg(long = "blog-posts-per-page", value_name = "COUNT")]
    pub blog_posts_per_page: Option<u32>,
    /// Override the public URL used to build absolute links.
    #[arg(long = "blog-public-site-url", value_name = "URL")]
    pub blog_public_site_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_serve_overrides() {
        let args = CliArgs::parse_from([
            "lectern",
            "serve",
            "--server-host",
            "0.0.0.0",
            "--database-url",
            "postgres://override",
            "--blog-posts-per-page",
            "5",
        ]);

        match args.command.expect("serve command") {
            Command::Serve(serve) => {
                assert_eq!(serve.overrides.server_host.as_deref(), Some("0.0.0.0"));
                assert_eq!(
                    serve.overrides.database_url.as_deref(),
                    Some("postgres://override")
                );
                assert_eq!(serve.overrides.blog_posts_per_page, Some(5));
            }
            _ => panic!("wrong command parsed"),
        }
    }

    #[test]
    fn parse_migrate_arguments() {
        let args = CliArgs::parse_from(["lectern", "migrate", "--database-url", "postgres://m"]);

        match args.command.expect("migrate command") {
            Command::Migrate(migrate) => {
                assert_eq!(
                    migrate.database.database_url.as_deref(),
                    Some("postgres://m")
                );
            }
            _ => panic!("wrong command parsed"),
        }
    }

    #[test]
    fn log_json_accepts_boolish_values() {
        let args = CliArgs::parse_from(["lectern", "serve", "--log-json", "yes"]);

        match args.command.expect("serve command") {
            Command::Serve(serve) => assert_eq!(serve.overrides.log_json, Some(true)),
            _ => panic!("wrong command parsed"),
        }
    }
}
