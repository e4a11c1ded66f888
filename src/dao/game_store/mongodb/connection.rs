use mongodb::{Client, Database, options::ClientOptions};

use super::error::{MongoDaoError, MongoResult};

/// Parse the connection string and open a client plus database handle.
pub(super) async fn establish_connection(
    uri: &str,
    database_name: &str,
) -> MongoResult<(Client, Database)> {
    let mut options = ClientOptions::parse(uri)
        .await
        .map_err(|source| MongoDaoError::Connect { source })?;
    options
        .app_name
        .get_or_insert_with(|| "gif-battle-back".to_string());

    let client =
        Client::with_options(options).map_err(|source| MongoDaoError::Connect { source })?;
    let database = client.database(database_name);

    Ok((client, database))
}
