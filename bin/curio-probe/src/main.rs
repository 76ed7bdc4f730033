//! curio probe.
//!
//! Loads one or more API paths through a resource loader the way a view
//! would: attach to the first path, switch to each following one, then print
//! the state the loader settled on and post a notice about it.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use curio_api::{ApiClient, CookieJar, RequestError, ReqwestTransport};
use curio_config::ClientConfig;
use curio_keymap::{KeyBindingDispatcher, KeyEvent, Shortcut, handler};
use curio_loader::{LoadState, ResourceLoader};
use curio_notifications::{Notice, NotificationBus, Status};
use serde_json::{Value, json};
use tracing::{info, warn};

/// Probe command line arguments.
#[derive(Parser, Debug)]
#[command(name = "curio-probe")]
#[command(about = "Load curio API paths and report the final state")]
struct Args {
	/// Config file (defaults to the user config directory)
	#[arg(short, long, value_name = "PATH")]
	config: Option<PathBuf>,

	/// Cookie string sent with every request, e.g. "sessionid=...; csrftoken=..."
	#[arg(long, value_name = "COOKIES")]
	cookie: Option<String>,

	/// Keys to press after loading; "r" reloads the current path
	#[arg(long = "press", value_name = "KEYS")]
	press: Vec<String>,

	/// Wait up to this many seconds for the summary notice to expire
	#[arg(long, value_name = "N", default_value_t = 0)]
	watch_secs: u64,

	/// Verbose logging
	#[arg(short, long)]
	verbose: bool,

	/// API paths; each one supersedes the previous
	#[arg(value_name = "PATH", required = true)]
	paths: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	let subscriber = tracing_subscriber::fmt()
		.with_max_level(if args.verbose {
			tracing::Level::DEBUG
		} else {
			tracing::Level::INFO
		})
		.with_writer(std::io::stderr)
		.finish();
	tracing::subscriber::set_global_default(subscriber)?;

	let config = match &args.config {
		Some(path) => ClientConfig::load(path)?,
		None => ClientConfig::discover()?,
	};
	info!(base_url = %config.base_url, prefix = %config.api_prefix, "probe.config");

	let transport = ReqwestTransport::new(config.request_timeout()).context("building HTTP client")?;
	let mut api = ApiClient::new(config.base_url()?, Arc::new(transport))
		.with_prefix(&config.api_prefix)
		.with_csrf(config.csrf_cookie.clone(), config.csrf_header.clone());
	if let Some(cookie) = &args.cookie {
		api = api.with_cookies(Arc::new(CookieJar::new(cookie.clone())));
	}

	let loader = Arc::new(ResourceLoader::new(api));
	loader.on_load(|data: &Value| {
		tracing::debug!(bytes = data.to_string().len(), "probe.loaded");
	});
	let mut state = loader.subscribe();

	let mut paths = args.paths.iter();
	if let Some(first) = paths.next() {
		loader.on_attach(first.as_str())?;
	}
	for path in paths {
		loader.on_key_change(path)?;
	}
	state.wait_for(LoadState::is_settled).await?;

	if !args.press.is_empty() {
		press_keys(&config, &loader, &args.press)?;
		state.wait_for(LoadState::is_settled).await?;
	}

	let final_state = loader.state();
	let key = loader.key().unwrap_or_default();
	loader.on_detach();
	println!("{}", serde_json::to_string_pretty(&render(&key, &final_state))?);

	let bus = NotificationBus::with_default_duration(config.notice_duration());
	bus.subscribe(|notice| info!(title = %notice.title, status = %notice.status, "probe.notice"));
	let notice = match &final_state.error {
		None => Notice::new(format!("Loaded {key}")).status(Status::Success),
		Some(err) => Notice::new(format!("Failed to load {key}"))
			.message(err.to_string())
			.status(Status::Error),
	};
	bus.publish(notice);

	if args.watch_secs > 0 {
		let mut live = bus.watch();
		let expired = tokio::time::timeout(Duration::from_secs(args.watch_secs), live.wait_for(Vec::is_empty)).await;
		match expired {
			Ok(_) => info!("probe.notice_expired"),
			Err(_) => warn!(secs = args.watch_secs, "probe.notice_still_visible"),
		}
	}
	bus.shutdown();

	if final_state.error.is_some() {
		std::process::exit(1);
	}
	Ok(())
}

/// Binds the probe's shortcuts and feeds `press` through them.
fn press_keys(config: &ClientConfig, loader: &Arc<ResourceLoader<ApiClient>>, press: &[String]) -> anyhow::Result<()> {
	let dispatcher = Arc::new(KeyBindingDispatcher::with_sequence_timeout(config.sequence_timeout()));
	let reload = {
		let loader = Arc::clone(loader);
		handler(move |_, combo| match loader.refresh() {
			Ok(generation) => info!(combo, generation, "probe.reload"),
			Err(err) => warn!(combo, error = %err, "probe.reload_failed"),
		})
	};
	let mut shortcut = Shortcut::new(Arc::clone(&dispatcher), "r", reload);
	shortcut.attach()?;

	for keys in press {
		for node in curio_keymap::parser::parse_seq(keys).with_context(|| format!("parsing --press {keys:?}"))? {
			let fired = dispatcher.handle_key(&KeyEvent::new(node));
			tracing::debug!(key = %node, fired, "probe.press");
		}
	}
	shortcut.detach();
	Ok(())
}

fn render(key: &str, state: &LoadState<Value, RequestError>) -> Value {
	json!({
		"key": key,
		"data": state.data,
		"error": state.error.as_ref().map(|err| json!({
			"kind": err.kind().as_str(),
			"message": err.to_string(),
			"status": err.status(),
			"data": err.data(),
		})),
		"is_loading": state.is_loading,
	})
}
