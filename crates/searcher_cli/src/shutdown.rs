use console::Term;

/// Resolve once Ctrl+C is received.
///
/// Used as the graceful-shutdown trigger for the REST server: in-flight
/// requests finish, new connections are refused.
pub(crate) async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }

    if Term::stdout().is_term() {
        eprintln!("\nShutdown requested, finishing in-flight requests...");
    } else {
        tracing::warn!("Shutdown requested, finishing in-flight requests");
    }
}
