//! PostgreSQL driver handle.

use tokio::task::JoinHandle;
use tokio_postgres::Client;

/// An open PostgreSQL session.
///
/// `tokio-postgres` splits a session into a [`Client`] and a connection future that
/// performs the actual I/O. The future runs on a spawned task; it finishes once the
/// client is dropped or the server closes the session.
pub struct PgDriver {
    client: Client,
    connection: JoinHandle<()>,
}

impl PgDriver {
    pub(crate) fn new(client: Client, connection: JoinHandle<()>) -> Self {
        Self { client, connection }
    }

    /// Borrow the client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Check whether the session has been closed by either side.
    pub fn is_closed(&self) -> bool {
        self.client.is_closed() || self.connection.is_finished()
    }

    /// Take the client and the connection task apart.
    pub fn into_parts(self) -> (Client, JoinHandle<()>) {
        (self.client, self.connection)
    }
}

impl std::fmt::Debug for PgDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgDriver")
            .field("closed", &self.is_closed())
            .finish()
    }
}
