#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortUrl {
    pub id: String,
    pub long_url: String,
}

#[async_trait::async_trait]
pub trait Shortener: Send + Sync {
    /// URLs recently shortened by this account.
    async fn history(&self) -> Result<Vec<ShortUrl>, anyhow::Error>;

    async fn shorten(&self, long_url: &str) -> Result<ShortUrl, anyhow::Error>;
}

pub struct Core {
    pub shortener: Box<dyn Shortener>,
}

impl Core {
    pub fn new(shortener: impl Shortener + 'static) -> Self {
        Self {
            shortener: Box::new(shortener),
        }
    }

    pub fn shortener(&self) -> &dyn Shortener {
        self.shortener.as_ref()
    }
}
