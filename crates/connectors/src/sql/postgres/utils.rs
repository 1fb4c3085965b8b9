use crate::sql::base::error::ConnectorError;
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use tokio_postgres::{
    Client, Config, NoTls, Socket,
    config::SslMode,
    tls::MakeTlsConnect,
};
use tracing::{error, warn};

/// Connects according to the URL's `sslmode`. `prefer` falls back to a plain
/// connection when the TLS handshake fails.
pub async fn connect_client(url: &str) -> Result<Client, ConnectorError> {
    let config = url
        .parse::<Config>()
        .map_err(|e| ConnectorError::InvalidUrl(e.to_string()))?;

    match config.get_ssl_mode() {
        SslMode::Disable => open(&config, NoTls).await,
        SslMode::Prefer => match open(&config, tls()?).await {
            Ok(client) => Ok(client),
            Err(err) => {
                warn!(%err, "TLS connection refused, falling back to plaintext");
                open(&config, NoTls).await
            }
        },
        _ => open(&config, tls()?).await,
    }
}

fn tls() -> Result<MakeTlsConnector, ConnectorError> {
    Ok(MakeTlsConnector::new(TlsConnector::builder().build()?))
}

/// Opens the connection and drives it on a background task for the lifetime
/// of the returned client.
async fn open<T>(config: &Config, tls: T) -> Result<Client, ConnectorError>
where
    T: MakeTlsConnect<Socket>,
    T::Stream: Send + 'static,
{
    let (client, connection) = config.connect(tls).await?;
    tokio::spawn(async move {
        if let Err(err) = connection.await {
            error!(%err, "Postgres connection closed with an error");
        }
    });
    Ok(client)
}
