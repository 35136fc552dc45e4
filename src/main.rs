use anyhow::Result;
use gridlife::{LifeApp, SimConfig};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SimConfig::from_env();
    LifeApp::new(config).run()
}
