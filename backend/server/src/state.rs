use std::sync::Arc;

use board::{RemoteBoard, RemoteError};

use super::config::Config;

pub struct State {
    pub config: Config,
    pub remote: RemoteBoard,
}

impl State {
    pub fn new() -> Result<Arc<Self>, RemoteError> {
        let config = Config::load();

        let remote = RemoteBoard::new(&config.board_api_url, config.board_api_timeout)?;

        Ok(Arc::new(Self { config, remote }))
    }
}
