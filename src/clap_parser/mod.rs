use crate::settings::ConnectionSettings;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "replag",
    author,
    version,
    about = "replag looks PostgreSQL replication lag",
    disable_help_flag = true
)]
pub struct Args {
    /// database server host
    #[arg(short = 'h', long, value_name = "HOSTNAME")]
    pub host: Option<String>,

    /// database server port
    #[arg(short = 'p', long, value_name = "PORT")]
    pub port: Option<u16>,

    /// database user name
    #[arg(short = 'U', long, value_name = "USERNAME")]
    pub username: Option<String>,

    /// database name to connect to
    #[arg(short = 'd', long, value_name = "DBNAME")]
    pub dbname: Option<String>,

    /// seconds to wait for each connection
    #[arg(short = 't', long, value_name = "SECONDS")]
    pub connect_timeout: Option<u64>,

    /// YAML file with connection defaults
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// log connection and query details to stderr
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// show this page and exit
    #[arg(short = '?', long, action = ArgAction::Help)]
    help: Option<bool>,

    #[arg(value_name = "DBNAME")]
    pub positional_dbname: Option<String>,

    #[arg(value_name = "USERNAME")]
    pub positional_username: Option<String>,
}

impl Args {
    /// Connection settings given on the command line. Flags win over the
    /// trailing `DBNAME USERNAME` arguments.
    pub fn connection_settings(&self) -> ConnectionSettings {
        ConnectionSettings {
            host: self.host.clone(),
            port: self.port,
            user: self
                .username
                .clone()
                .or_else(|| self.positional_username.clone()),
            dbname: self
                .dbname
                .clone()
                .or_else(|| self.positional_dbname.clone()),
            password: None,
            connect_timeout_sec: self.connect_timeout,
            application_name: None,
        }
    }
}
