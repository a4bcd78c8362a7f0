use crate::config::LayoutConfig;
use crate::layer::JsonLayoutLayer;
use crate::layout::JsonLayout;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Install a global `tracing` subscriber that formats every event with a
/// [`JsonLayout`] and writes the lines through the given writer factory.
///
/// **Parameters**
/// - `config`: [`LayoutConfig`] for the layout, built once and shared
///   read-only for the process lifetime.
/// - `make_writer`: destination for the records, e.g. `std::io::stdout`
///   or a `tracing_appender` non-blocking writer.
///
/// **Effects**
///
/// This installs a [`Registry`] combined with [`JsonLayoutLayer`] as the
/// global default subscriber, so all `tracing` events in the process are
/// rendered as single-line JSON records.
pub fn init_layout_with_writer<W>(config: LayoutConfig, make_writer: W)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = JsonLayoutLayer::new(JsonLayout::new(config), make_writer);
    let subscriber = Registry::default().with(layer);
    tracing::subscriber::set_global_default(subscriber).expect("set global subscriber");
}

/// Install the layout writing to stdout.
///
/// Equivalent to calling [`init_layout_with_writer`] with
/// `std::io::stdout`. This is the recommended entrypoint for services
/// whose platform collects container stdout.
pub fn init_layout(config: LayoutConfig) {
    init_layout_with_writer(config, std::io::stdout);
}
