use leptos::prelude::*;
use private_aave_leptos::App;
use tracing::Level;
use tracing_subscriber::fmt;
use tracing_subscriber_wasm::MakeConsoleWriter;

fn main() {
    fmt()
        .with_writer(MakeConsoleWriter::default().map_trace_level_to(Level::DEBUG))
        .with_max_level(Level::DEBUG)
        .with_ansi(false)
        .without_time()
        .init();

    console_error_panic_hook::set_once();

    mount_to_body(App);
}
