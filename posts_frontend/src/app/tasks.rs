use std::sync::mpsc::Sender;
use std::thread;

use log::error;

use crate::api::ApiClient;
use crate::cache::QueryKey;
use crate::models::{CreatePostInput, UpdatePostInput};

use super::messages::AppMessage;

pub fn load_posts(
    client: ApiClient,
    tx: Sender<AppMessage>,
    key: QueryKey,
    generation: u64,
    page: u32,
    limit: u32,
) {
    thread::spawn(move || {
        let result = client.list_posts(page, limit);
        let message = AppMessage::PageLoaded {
            key,
            generation,
            result,
        };
        if tx.send(message).is_err() {
            error!("failed to send PageLoaded message");
        }
    });
}

pub fn load_post(client: ApiClient, tx: Sender<AppMessage>, id: u64, generation: u64) {
    thread::spawn(move || {
        let result = client.get_post(id);
        let message = AppMessage::PostLoaded {
            id,
            generation,
            result,
        };
        if tx.send(message).is_err() {
            error!("failed to send PostLoaded message");
        }
    });
}

pub fn create_post(
    client: ApiClient,
    tx: Sender<AppMessage>,
    session: u64,
    payload: CreatePostInput,
) {
    thread::spawn(move || {
        let result = client.create_post(&payload);
        if tx.send(AppMessage::PostCreated { session, result }).is_err() {
            error!("failed to send PostCreated message");
        }
    });
}

pub fn update_post(
    client: ApiClient,
    tx: Sender<AppMessage>,
    session: u64,
    payload: UpdatePostInput,
) {
    thread::spawn(move || {
        let id = payload.id;
        let result = client.update_post(&payload);
        let message = AppMessage::PostUpdated {
            session,
            id,
            result,
        };
        if tx.send(message).is_err() {
            error!("failed to send PostUpdated message");
        }
    });
}

pub fn delete_post(client: ApiClient, tx: Sender<AppMessage>, id: u64) {
    thread::spawn(move || {
        let result = client.delete_post(id);
        if tx.send(AppMessage::PostDeleted { id, result }).is_err() {
            error!("failed to send PostDeleted message");
        }
    });
}
