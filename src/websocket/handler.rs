use crate::{
    config::Config,
    models::MAX_WORDS,
    puzzle::{GenerateError, PuzzleSession, SessionError},
    websocket::messages::{ClientMessage, ServerMessage},
    AppState,
};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Puzzle state for one connection, owned by its receive task
#[derive(Debug)]
pub struct ConnectionState {
    session: PuzzleSession,
    /// Id under which the session's current puzzle was stored
    puzzle_id: Option<Uuid>,
}

impl ConnectionState {
    pub fn new(config: &Config) -> Self {
        Self::with_session(
            PuzzleSession::new(config.puzzle.default_settings)
                .with_attempts(config.puzzle.attempts_per_word),
        )
    }

    pub fn with_session(session: PuzzleSession) -> Self {
        Self {
            session,
            puzzle_id: None,
        }
    }

    /// Forget the stored id once the session has no exportable puzzle
    fn sync_puzzle_id(&mut self) {
        if self.session.puzzle().is_none() {
            self.puzzle_id = None;
        }
    }

    fn state_message(&self) -> ServerMessage {
        ServerMessage::SessionState {
            settings: *self.session.settings(),
            words: self.session.words().words().to_vec(),
            max_words: MAX_WORDS,
            max_word_length: self.session.settings().size.max_word_len(),
            can_export: self.session.can_export(),
            puzzle_id: self.puzzle_id.map(|id| id.to_string()),
        }
    }

    fn word_list_message(&self) -> ServerMessage {
        ServerMessage::WordList {
            words: self.session.words().words().to_vec(),
            count: self.session.words().len(),
            max_words: MAX_WORDS,
        }
    }
}

/// WebSocket upgrade handler
pub async fn handle_websocket(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(100);
    let connection_id = Uuid::new_v4();

    tracing::info!("WebSocket connection established: {}", connection_id);

    let mut connection = ConnectionState::new(&state.config);
    let _ = tx.send(connection.state_message()).await;

    // Spawn a task to send messages to the client
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to serialize message: {}", e);
                }
            }
        }
    });

    // Handle incoming messages from the client
    let state_for_recv = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(client_msg) => {
                        if let Err(e) =
                            handle_client_message(client_msg, &mut connection, &state_for_recv, &tx)
                                .await
                        {
                            tracing::debug!("Command rejected on {}: {}", connection_id, e);
                            let error_msg = ServerMessage::Error {
                                message: e.to_string(),
                            };
                            let _ = tx.send(error_msg).await;
                        }
                    }
                    Err(e) => {
                        tracing::error!("Failed to parse message: {}", e);
                        let error_msg = ServerMessage::Error {
                            message: format!("Invalid message format: {}", e),
                        };
                        let _ = tx.send(error_msg).await;
                    }
                },
                Message::Close(_) => {
                    tracing::info!("Client disconnected: {}", connection_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // Wait for either task to finish
    tokio::select! {
        _ = (&mut send_task) => {
            recv_task.abort();
        }
        _ = (&mut recv_task) => {
            send_task.abort();
        }
    }

    tracing::info!("WebSocket connection closed: {}", connection_id);
}

/// Apply one client command to the connection's session
async fn handle_client_message(
    msg: ClientMessage,
    connection: &mut ConnectionState,
    state: &AppState,
    tx: &mpsc::Sender<ServerMessage>,
) -> anyhow::Result<()> {
    match msg {
        ClientMessage::AddWord { word } => {
            let added = connection.session.add_word(&word)?;
            tracing::debug!("Added word {}", added);
            connection.sync_puzzle_id();
            tx.send(connection.word_list_message()).await?;
        }
        ClientMessage::RemoveWord { word } => {
            if connection.session.remove_word(&word) {
                tracing::debug!("Removed word {}", word);
            }
            connection.sync_puzzle_id();
            tx.send(connection.word_list_message()).await?;
        }
        ClientMessage::SetGridSize { size } => {
            connection.session.set_size(size);
            tx.send(connection.state_message()).await?;
        }
        ClientMessage::SetAllowDiagonal { enabled } => {
            connection.session.set_allow_diagonal(enabled);
            tx.send(connection.state_message()).await?;
        }
        ClientMessage::SetAllowBackwards { enabled } => {
            connection.session.set_allow_backwards(enabled);
            tx.send(connection.state_message()).await?;
        }
        ClientMessage::Generate => match connection.session.generate() {
            Ok(puzzle) => {
                let stored = state.store_puzzle(puzzle.clone(), None);
                connection.puzzle_id = Some(stored.puzzle_id);
                tracing::info!(
                    "Generated puzzle {} ({} words, {}x{})",
                    stored.puzzle_id,
                    puzzle.words.len(),
                    puzzle.side(),
                    puzzle.side()
                );
                tx.send(ServerMessage::PuzzleGenerated {
                    puzzle_id: stored.puzzle_id.to_string(),
                    size: puzzle.size,
                    grid: puzzle.rows(),
                    words: puzzle.words.clone(),
                    placements: puzzle.placements.clone(),
                })
                .await?;
            }
            Err(SessionError::Generate(GenerateError::PlacementExhausted { word, .. })) => {
                connection.sync_puzzle_id();
                tracing::info!("Generation failed, could not place {}", word);
                tx.send(ServerMessage::GenerationFailed {
                    reason: format!(
                        "Could not fit \"{}\". Try fewer words or a bigger grid!",
                        word
                    ),
                    word,
                })
                .await?;
            }
            Err(e) => return Err(e.into()),
        },
        ClientMessage::GetState => {
            tx.send(connection.state_message()).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GridSize, PuzzleSettings};
    use rand::{rngs::StdRng, SeedableRng};

    fn setup() -> (
        AppState,
        ConnectionState,
        mpsc::Sender<ServerMessage>,
        mpsc::Receiver<ServerMessage>,
    ) {
        let state = AppState::new(Config::default());
        let session =
            PuzzleSession::with_rng(PuzzleSettings::default(), StdRng::seed_from_u64(17));
        let (tx, rx) = mpsc::channel(16);
        (state, ConnectionState::with_session(session), tx, rx)
    }

    #[test]
    fn test_client_message_format() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"add_word","word":"cat"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::AddWord { ref word } if word == "cat"));

        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"set_grid_size","size":"huge"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::SetGridSize { size: GridSize::Huge }));

        let msg: ClientMessage = serde_json::from_str(r#"{"type":"generate"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Generate));
    }

    #[test]
    fn test_server_message_is_tagged() {
        let json = serde_json::to_value(ServerMessage::GenerationFailed {
            word: "CAT".to_string(),
            reason: "no room".to_string(),
        })
        .unwrap();
        assert_eq!(json["type"], "generation_failed");
        assert_eq!(json["word"], "CAT");
    }

    #[tokio::test]
    async fn test_add_word_replies_with_word_list() {
        let (state, mut connection, tx, mut rx) = setup();

        handle_client_message(
            ClientMessage::AddWord {
                word: "rust".to_string(),
            },
            &mut connection,
            &state,
            &tx,
        )
        .await
        .unwrap();

        match rx.recv().await.unwrap() {
            ServerMessage::WordList { words, count, max_words } => {
                assert_eq!(words, vec!["RUST".to_string()]);
                assert_eq!(count, 1);
                assert_eq!(max_words, 16);
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_duplicate_word_is_an_error() {
        let (state, mut connection, tx, _rx) = setup();
        let add = || ClientMessage::AddWord {
            word: "cat".to_string(),
        };

        handle_client_message(add(), &mut connection, &state, &tx)
            .await
            .unwrap();
        let err = handle_client_message(add(), &mut connection, &state, &tx)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "\"CAT\" is already in the list");
    }

    #[tokio::test]
    async fn test_generate_without_words_is_an_error() {
        let (state, mut connection, tx, _rx) = setup();
        let err = handle_client_message(ClientMessage::Generate, &mut connection, &state, &tx)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Add some words first");
        assert!(state.puzzles.is_empty());
    }

    #[tokio::test]
    async fn test_generate_stores_puzzle_for_export() {
        let (state, mut connection, tx, mut rx) = setup();

        for word in ["cat", "dog"] {
            handle_client_message(
                ClientMessage::AddWord {
                    word: word.to_string(),
                },
                &mut connection,
                &state,
                &tx,
            )
            .await
            .unwrap();
            rx.recv().await.unwrap();
        }

        handle_client_message(ClientMessage::Generate, &mut connection, &state, &tx)
            .await
            .unwrap();

        let puzzle_id = match rx.recv().await.unwrap() {
            ServerMessage::PuzzleGenerated {
                puzzle_id,
                size,
                grid,
                words,
                placements,
            } => {
                assert_eq!(size, GridSize::Medium);
                assert_eq!(grid.len(), 15);
                assert_eq!(words, vec!["CAT".to_string(), "DOG".to_string()]);
                assert_eq!(placements.len(), 2);
                puzzle_id
            }
            other => panic!("unexpected message: {:?}", other),
        };

        let id: Uuid = puzzle_id.parse().unwrap();
        assert!(state.get_puzzle(&id).is_some());
        assert_eq!(connection.puzzle_id, Some(id));

        handle_client_message(ClientMessage::GetState, &mut connection, &state, &tx)
            .await
            .unwrap();
        match rx.recv().await.unwrap() {
            ServerMessage::SessionState {
                can_export,
                puzzle_id,
                ..
            } => {
                assert!(can_export);
                assert_eq!(puzzle_id, Some(id.to_string()));
            }
            other => panic!("unexpected message: {:?}", other),
        }

        // Editing the list makes the puzzle stale
        handle_client_message(
            ClientMessage::RemoveWord {
                word: "dog".to_string(),
            },
            &mut connection,
            &state,
            &tx,
        )
        .await
        .unwrap();
        assert_eq!(connection.puzzle_id, None);
    }

    #[tokio::test]
    async fn test_generation_failure_is_reported() {
        let (state, mut connection, tx, mut rx) = setup();

        handle_client_message(
            ClientMessage::AddWord {
                word: "kaleidoscope".to_string(),
            },
            &mut connection,
            &state,
            &tx,
        )
        .await
        .unwrap();
        rx.recv().await.unwrap();

        // The word was accepted for a medium grid but is too long for a tiny one
        handle_client_message(
            ClientMessage::SetGridSize {
                size: GridSize::Tiny,
            },
            &mut connection,
            &state,
            &tx,
        )
        .await
        .unwrap();
        rx.recv().await.unwrap();

        handle_client_message(ClientMessage::Generate, &mut connection, &state, &tx)
            .await
            .unwrap();

        match rx.recv().await.unwrap() {
            ServerMessage::GenerationFailed { word, reason } => {
                assert_eq!(word, "KALEIDOSCOPE");
                assert!(reason.contains("bigger grid"));
            }
            other => panic!("unexpected message: {:?}", other),
        }
        assert!(state.puzzles.is_empty());
        assert_eq!(connection.puzzle_id, None);
    }

    #[tokio::test]
    async fn test_settings_commands_reply_with_state() {
        let (state, mut connection, tx, mut rx) = setup();

        handle_client_message(
            ClientMessage::SetAllowDiagonal { enabled: false },
            &mut connection,
            &state,
            &tx,
        )
        .await
        .unwrap();
        rx.recv().await.unwrap();

        handle_client_message(
            ClientMessage::SetAllowBackwards { enabled: false },
            &mut connection,
            &state,
            &tx,
        )
        .await
        .unwrap();

        match rx.recv().await.unwrap() {
            ServerMessage::SessionState {
                settings,
                max_word_length,
                can_export,
                puzzle_id,
                ..
            } => {
                assert!(!settings.allow_diagonal);
                assert!(!settings.allow_backwards);
                assert_eq!(settings.size, GridSize::Medium);
                assert_eq!(max_word_length, 15);
                assert!(!can_export);
                assert!(puzzle_id.is_none());
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }
}
