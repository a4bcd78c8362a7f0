use tracing::{error, info};

use tracing_json_layout::config::LayoutConfig;
use tracing_json_layout::init::init_layout;

fn main() {
    let config = LayoutConfig {
        environment: "dev".to_string(),
        application: "demo".to_string(),
        system: "examples".to_string(),
        component: "basic".to_string(),
        ..LayoutConfig::default()
    };
    init_layout(config);

    info!("service started");
    error!(code = 503, "upstream unavailable");
}
