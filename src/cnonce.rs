use rand::Rng;

/// Source of client nonces.
///
/// Production code uses [`RandomCnonce`]; tests inject a closure returning fixed values.
/// Implementations are shared by reference across concurrent calls.
pub trait CnonceSource: Send + Sync {
    fn cnonce(&self) -> String;
}

/// 8 bytes from the thread-local CSPRNG, as 16 lowercase hex characters
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomCnonce;

impl CnonceSource for RandomCnonce {
    fn cnonce(&self) -> String {
        generate_cnonce()
    }
}

impl<F> CnonceSource for F
where
    F: Fn() -> String + Send + Sync,
{
    fn cnonce(&self) -> String {
        self()
    }
}

/// Generate a fresh random client nonce
pub fn generate_cnonce() -> String {
    let mut rng = rand::thread_rng();
    let nonce_bytes: [u8; 8] = rng.gen();
    hex::encode(nonce_bytes)
}
