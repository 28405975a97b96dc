//! Blocking JSON POST with exponential backoff and jitter.
use std::time::Duration;

use log::{info, warn};
use rand::Rng;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::Error;

/// Jitter is drawn uniformly in `[0, JITTER_RATIO * delay)`.
const JITTER_RATIO: f64 = 0.1;

/// Delay before the retry following (0-based) `attempt`: `min(base * 2^attempt, max)`.
pub fn backoff_delay(attempt: u32, base: Duration, max: Duration) -> Duration {
    // 2^attempt overflows quickly, and anything past max is clamped anyway.
    let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
    base.checked_mul(factor).map_or(max, |d| d.min(max))
}

fn with_jitter(delay: Duration) -> Duration {
    let jitter = rand::thread_rng().gen_range(0.0..JITTER_RATIO);
    delay + delay.mul_f64(jitter)
}

/// Short, loggable kind of a failed attempt.
fn failure_kind(e: &Error) -> &'static str {
    match e {
        Error::Http(e) if e.is_timeout() => "Timeout",
        Error::Http(e) if e.is_decode() => "Invalid response body",
        Error::HttpStatus(_) => "HTTP error",
        _ => "Request error",
    }
}

/// Holds the http client and the retry policy.
pub struct RetryingClient {
    client: reqwest::blocking::Client,
    max_retries: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl RetryingClient {
    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            max_retries: config.max_retries,
            base_delay: config.base_delay,
            max_delay: config.max_delay,
        })
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// single attempt: any transport error, non-2xx status or undecodable body is a failure.
    fn attempt<B, R>(&self, endpoint: &Url, payload: &B, timeout: Duration) -> Result<R, Error>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(endpoint.clone())
            .timeout(timeout)
            .json(payload)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus(status.as_u16()));
        }

        Ok(response.json()?)
    }

    /// POST `payload` to `endpoint`, retrying up to `max_retries` times.
    ///
    /// Between two attempts the calling thread sleeps for [backoff_delay] plus up to 10% jitter.
    /// There is no sleep after the last attempt.
    /// Exhausting every attempt yields [Error::RetriesExhausted].
    /// Deciding what it invalidates is left to the caller.
    pub fn post<B, R>(&self, endpoint: &Url, payload: &B, timeout: Duration) -> Result<R, Error>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let mut last = None;
        for attempt in 0..self.max_retries {
            match self.attempt(endpoint, payload, timeout) {
                Ok(response) => return Ok(response),
                Err(e) => {
                    warn!(
                        "{} on attempt {}/{}: {}",
                        failure_kind(&e),
                        attempt + 1,
                        self.max_retries,
                        e
                    );
                    last = Some(e);
                }
            }

            if attempt + 1 < self.max_retries {
                let delay = with_jitter(backoff_delay(attempt, self.base_delay, self.max_delay));
                info!("Retrying in {:.2} seconds...", delay.as_secs_f64());
                std::thread::sleep(delay);
            }
        }

        Err(Error::RetriesExhausted {
            attempts: self.max_retries,
            last: Box::new(
                last.unwrap_or_else(|| Error::Custom("no attempt was allowed".to_string())),
            ),
        })
    }
}
