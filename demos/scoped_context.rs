use tracing::info;

use tracing_json_layout::config::LayoutConfig;
use tracing_json_layout::context;
use tracing_json_layout::init::init_layout;

fn main() {
    let config = LayoutConfig {
        environment: "dev".to_string(),
        application: "demo".to_string(),
        custom_log: r#"{"user":"%X{uid}","request":"%X{request_id}"}"#.to_string(),
        ..LayoutConfig::default()
    };
    init_layout(config);

    // No context yet: both placeholders degrade to null.
    info!("before any context");

    {
        let _uid = context::scoped("uid", "42");
        let _req = context::scoped("request_id", "req-1");
        info!("inside the request");
    }

    // Guards dropped, the context is clean again.
    info!("after the request");
}
