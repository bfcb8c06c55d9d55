//! Signed run-result tokens. When a session ends the server issues a token
//! over the player's final stats; the leaderboard endpoint later verifies
//! it, so stats can travel through an untrusted client without being
//! forgeable.
//!
//! Token layout: `base64url(claim) . base64url(hmac_sha256(claim))` where
//! the claim is `player|survived_ticks|expires_unix|nonce`. The player name
//! is free-form and may itself contain the separator, so the verifier
//! splits the three trailing numeric fields off from the right. The nonce
//! keeps tokens for identical runs distinct.

use std::time::{SystemTime, UNIX_EPOCH};

use ring::hmac;
use thiserror::Error;

const B64: base64::Config = base64::URL_SAFE_NO_PAD;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is structurally malformed")]
    Malformed,
    #[error("token signature does not verify")]
    BadSignature,
    #[error("token expired at unix time {expired_at}")]
    Expired { expired_at: u64 },
    #[error("system clock is before the unix epoch")]
    Clock,
}

/// The facts a token attests to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsClaim {
    pub player: String,
    pub survived_ticks: u32,
    pub expires_unix: u64,
    pub nonce: u64,
}

/// HMAC key wrapper. Constructed once from the server secret and shared by
/// issue and verify.
pub struct StatsKey {
    key: hmac::Key,
}

impl StatsKey {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            key: hmac::Key::new(hmac::HMAC_SHA256, secret),
        }
    }

    /// Issues a token valid for `ttl_secs` from now.
    pub fn issue(&self, player: &str, survived_ticks: u32, ttl_secs: u64) -> Result<String, TokenError> {
        let now = unix_now()?;
        Ok(self.issue_at(player, survived_ticks, now + ttl_secs))
    }

    /// Issues a token with an explicit expiry. Deterministic apart from the
    /// nonce.
    pub fn issue_at(&self, player: &str, survived_ticks: u32, expires_unix: u64) -> String {
        let claim = format!(
            "{}|{}|{}|{}",
            player,
            survived_ticks,
            expires_unix,
            fastrand::u64(..)
        );
        let tag = hmac::sign(&self.key, claim.as_bytes());
        format!(
            "{}.{}",
            base64::encode_config(claim.as_bytes(), B64),
            base64::encode_config(tag.as_ref(), B64)
        )
    }

    /// Verifies a token against the current clock.
    pub fn verify(&self, token: &str) -> Result<StatsClaim, TokenError> {
        self.verify_at(token, unix_now()?)
    }

    /// Signature first, then expiry: an attacker learns nothing about a
    /// token's contents from the error unless the signature already holds.
    pub fn verify_at(&self, token: &str, now_unix: u64) -> Result<StatsClaim, TokenError> {
        let (claim_b64, tag_b64) = token.split_once('.').ok_or(TokenError::Malformed)?;
        let claim_bytes =
            base64::decode_config(claim_b64, B64).map_err(|_| TokenError::Malformed)?;
        let tag = base64::decode_config(tag_b64, B64).map_err(|_| TokenError::Malformed)?;

        hmac::verify(&self.key, &claim_bytes, &tag).map_err(|_| TokenError::BadSignature)?;

        let claim_str = String::from_utf8(claim_bytes).map_err(|_| TokenError::Malformed)?;
        // Only the player field is free-form, so the numeric fields are
        // peeled off the right and whatever remains is the name.
        let mut parts = claim_str.rsplitn(4, '|');
        let nonce: u64 = parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or(TokenError::Malformed)?;
        let expires_unix: u64 = parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or(TokenError::Malformed)?;
        let survived_ticks: u32 = parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or(TokenError::Malformed)?;
        let player = parts.next().ok_or(TokenError::Malformed)?.to_string();

        if now_unix > expires_unix {
            return Err(TokenError::Expired {
                expired_at: expires_unix,
            });
        }

        Ok(StatsClaim {
            player,
            survived_ticks,
            expires_unix,
            nonce,
        })
    }
}

fn unix_now() -> Result<u64, TokenError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|_| TokenError::Clock)
}
