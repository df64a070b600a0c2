pub const MAX_DIGEST_INSIGHTS: usize = 5;

pub const USD_CURRENCY: &str = "usd";

pub const DEFAULT_DIGEST_TOKENS: &str = "bitcoin,ethereum,solana,ripple,dogecoin";

pub const PERPLEXITY_API_BASE: &str = "https://api.perplexity.ai";
pub const RESEND_API_URL: &str = "https://api.resend.com/emails";
pub const SCREENSHOT_API_URL: &str = "https://api.screenshotone.com/take";
