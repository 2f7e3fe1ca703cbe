//! Response DTOs
//!
//! Data structures for API response bodies.

use serde::Serialize;

use crate::application::services::{
    AccessToken, AuthTokens, MessageDto, ThreadDetailDto, ThreadDto, UserDto,
};

/// Authentication token pair response
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

impl From<AuthTokens> for TokenResponse {
    fn from(tokens: AuthTokens) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
            token_type: tokens.token_type,
        }
    }
}

/// Refreshed access token response
#[derive(Debug, Serialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

impl From<AccessToken> for AccessTokenResponse {
    fn from(token: AccessToken) -> Self {
        Self {
            access_token: token.access_token,
            expires_in: token.expires_in,
            token_type: token.token_type,
        }
    }
}

/// Message response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub id: String,
    pub thread_id: String,
    pub sender_id: String,
    pub text: String,
    pub is_read: bool,
    pub created_at: String,
}

impl From<MessageDto> for MessageResponse {
    fn from(dto: MessageDto) -> Self {
        Self {
            id: dto.id,
            thread_id: dto.thread_id,
            sender_id: dto.sender_id,
            text: dto.text,
            is_read: dto.is_read,
            created_at: dto.created_at,
        }
    }
}

/// Thread response for list/create endpoints
#[derive(Debug, Serialize)]
pub struct ThreadResponse {
    pub id: String,
    pub participants: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
    pub last_message: Option<MessageResponse>,
}

impl From<ThreadDto> for ThreadResponse {
    fn from(dto: ThreadDto) -> Self {
        Self {
            id: dto.id,
            participants: dto.participants,
            created_at: dto.created_at,
            updated_at: dto.updated_at,
            last_message: dto.last_message.map(MessageResponse::from),
        }
    }
}

/// Thread response for the retrieve endpoint
#[derive(Debug, Serialize)]
pub struct ThreadDetailResponse {
    pub id: String,
    pub messages: Vec<MessageResponse>,
}

impl From<ThreadDetailDto> for ThreadDetailResponse {
    fn from(dto: ThreadDetailDto) -> Self {
        Self {
            id: dto.id,
            messages: dto.messages.into_iter().map(MessageResponse::from).collect(),
        }
    }
}

/// User directory entry response
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub unread_messages: i64,
}

impl From<UserDto> for UserResponse {
    fn from(dto: UserDto) -> Self {
        Self {
            id: dto.id,
            username: dto.username,
            unread_messages: dto.unread_messages,
        }
    }
}
