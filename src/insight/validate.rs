use url::Url;

/// Hostnames treated as reputable financial-news sources. A candidate URL
/// passes when its hostname equals one of these entries or is a dot-suffix
/// of one (subdomains of a whitelisted domain are accepted).
pub const REPUTABLE_DOMAINS: [&str; 11] = [
    "bloomberg.com",
    "reuters.com",
    "wsj.com",
    "ft.com",
    "cnbc.com",
    "marketwatch.com",
    "finance.yahoo.com",
    "economist.com",
    "forbes.com",
    "businessinsider.com",
    "nasdaq.com",
];

// Section/listing pages that are never a specific article, regardless of
// where the URL came from.
const GENERIC_PAGE_PATHS: [&str; 6] = [
    "/markets",
    "/markets/crypto",
    "/market-data",
    "/quote",
    "/quotes",
    "/cryptocurrencies",
];

// Provider-specific live-data pages rejected by the relaxed fallback check.
const GENERIC_DATA_PATHS: [&str; 4] = [
    "/market-activity",
    "/data",
    "/live-markets",
    "/watchlist",
];

const NON_ARTICLE_PATH_PARTS: [&str; 6] = [
    "/category/",
    "/search?",
    "/tag/",
    "/author/",
    "/archive/",
    "/dashboard/",
];

fn parse_lenient(url: &str) -> Option<Url> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }
    if url.contains("://") {
        Url::parse(url).ok()
    } else {
        Url::parse(&format!("https://{url}")).ok()
    }
}

/// Whether the URL's hostname belongs to the reputable-source whitelist.
/// Malformed input is simply not reputable; this never panics.
pub fn is_reputable(url: &str) -> bool {
    let Some(parsed) = parse_lenient(url) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };
    let host = host.to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);

    REPUTABLE_DOMAINS
        .iter()
        .any(|domain| host == *domain || host.ends_with(&format!(".{domain}")))
}

fn is_generic_page(path: &str) -> bool {
    let trimmed = path.trim_end_matches('/');
    GENERIC_PAGE_PATHS.iter().any(|p| trimmed == *p)
}

fn is_generic_data_page(path: &str) -> bool {
    let trimmed = path.trim_end_matches('/');
    GENERIC_DATA_PATHS.iter().any(|p| trimmed == *p)
}

/// Path-shape heuristic: does the URL point at a specific article rather
/// than a homepage, section page, or search/listing page?
///
/// `trusted` marks URLs that came from the upstream citation list. Those are
/// independently retrieved rather than author-asserted, so only the root
/// path and the known generic section pages are rejected. Untrusted URLs
/// (the insight's own `link` field) additionally fail on category, search,
/// tag, author, archive and dashboard paths.
pub fn looks_like_article(url: &str, trusted: bool) -> bool {
    let Some(parsed) = parse_lenient(url) else {
        return false;
    };

    let path = parsed.path().to_lowercase();
    if path.is_empty() || path == "/" {
        return false;
    }
    if is_generic_page(&path) {
        return false;
    }
    if trusted {
        return true;
    }

    let haystack = match parsed.query() {
        Some(query) => format!("{path}?{}", query.to_lowercase()),
        None => path.clone(),
    };
    if NON_ARTICLE_PATH_PARTS
        .iter()
        .any(|part| haystack.contains(part))
    {
        return false;
    }

    path.split('/').any(|segment| !segment.is_empty())
}

/// Relaxed article check used by the fallback reconstruction pass: rejects
/// the root path, the obvious non-article sections and provider data pages,
/// but does not insist on the strict path shape.
pub fn passes_relaxed_article_check(url: &str) -> bool {
    let Some(parsed) = parse_lenient(url) else {
        return false;
    };

    let path = parsed.path().to_lowercase();
    if path.is_empty() || path == "/" {
        return false;
    }
    if is_generic_page(&path) || is_generic_data_page(&path) {
        return false;
    }

    let blocked = ["/category/", "/tag/", "/author/", "/archive/", "/dashboard/"];
    !blocked.iter().any(|part| path.contains(part))
}
