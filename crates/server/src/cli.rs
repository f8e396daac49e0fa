use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "perfwatch-server", version, about = "Performance monitoring and alerting endpoint")]
pub struct Cli {
    /// YAML configuration file; built-in defaults when omitted
    #[arg(short, long, env = "PERFWATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to bind the HTTP listener to
    #[arg(short, long, env = "PERFWATCH_LISTEN", default_value = "0.0.0.0:9464")]
    pub listen: String,
}
