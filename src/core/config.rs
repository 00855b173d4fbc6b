use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub phone_auth: PhoneAuthConfig,
    pub geocoding: GeocodingConfig,
    pub swagger: SwaggerConfig,
    pub minio: MinIOConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

/// Verification settings for ID tokens issued by the phone auth provider
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub issuer: String,
    pub audience: String,
    pub jwks_url: String,
    pub jwks_cache_ttl: Duration,
    pub jwt_leeway: Duration,
}

/// Phone OTP provider REST API (Identity Toolkit compatible)
#[derive(Debug, Clone)]
pub struct PhoneAuthConfig {
    pub api_base_url: String,
    pub api_key: String,
    pub token_url: String,
}

/// Forward geocoding client settings
#[derive(Debug, Clone)]
pub struct GeocodingConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub batch_size: usize,
    /// Most coordinates kept in the in-process geocode cache
    pub cache_capacity: u64,
    pub default_center_lat: f64,
    pub default_center_lon: f64,
    /// Maximum random offset, in degrees, applied to synthetic coordinates
    pub synthetic_jitter_deg: f64,
    pub allow_synthetic: bool,
    pub default_radius_miles: f64,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

/// MinIO/S3 storage configuration for vendor images
#[derive(Debug, Clone)]
pub struct MinIOConfig {
    /// MinIO/S3 endpoint URL
    pub endpoint: String,
    /// Public endpoint URL for publicly accessible files (optional, defaults to endpoint)
    pub public_endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    /// AWS region (for S3 compatibility)
    pub region: String,
    /// Prefix for public files (e.g., "public")
    pub public_prefix: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                tracing::warn!("Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            phone_auth: PhoneAuthConfig::from_env()?,
            geocoding: GeocodingConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
            minio: MinIOConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid number".to_string())?;

        let min_connections = env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MIN_CONNECTIONS must be a valid number".to_string())?;

        let acquire_timeout_secs = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_ACQUIRE_TIMEOUT_SECS must be a valid number".to_string())?;

        let idle_timeout_secs = env::var("DB_IDLE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_IDLE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_IDLE_TIMEOUT_SECS must be a valid number".to_string())?;

        let max_lifetime_secs = env::var("DB_MAX_LIFETIME_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_LIFETIME_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_MAX_LIFETIME_SECS must be a valid number".to_string())?;

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
        })
    }
}

impl AuthConfig {
    const DEFAULT_JWKS_CACHE_TTL_SECS: u64 = 3600; // 1 hour
    const DEFAULT_JWT_LEEWAY_SECS: u64 = 60;
    const DEFAULT_JWKS_URL: &'static str =
        "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

    pub fn from_env() -> Result<Self, String> {
        let audience = env::var("AUTH_PROJECT_ID")
            .map_err(|_| "AUTH_PROJECT_ID environment variable is required".to_string())?;

        // Issuer defaults to the secure token issuer for the project
        let issuer = env::var("AUTH_ISSUER")
            .unwrap_or_else(|_| format!("https://securetoken.google.com/{}", audience));

        let jwks_url = env::var("AUTH_JWKS_URL").unwrap_or_else(|_| Self::DEFAULT_JWKS_URL.to_string());

        let jwks_cache_ttl_secs = env::var("JWKS_CACHE_TTL")
            .unwrap_or_else(|_| Self::DEFAULT_JWKS_CACHE_TTL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "JWKS_CACHE_TTL must be a valid number".to_string())?;

        let jwt_leeway_secs = env::var("JWT_LEEWAY")
            .unwrap_or_else(|_| Self::DEFAULT_JWT_LEEWAY_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "JWT_LEEWAY must be a valid number".to_string())?;

        Ok(Self {
            issuer,
            audience,
            jwks_url,
            jwks_cache_ttl: Duration::from_secs(jwks_cache_ttl_secs),
            jwt_leeway: Duration::from_secs(jwt_leeway_secs),
        })
    }
}

impl PhoneAuthConfig {
    pub fn from_env() -> Result<Self, String> {
        let api_key = env::var("AUTH_API_KEY")
            .map_err(|_| "AUTH_API_KEY environment variable is required".to_string())?;

        let api_base_url = env::var("AUTH_API_BASE_URL")
            .unwrap_or_else(|_| "https://identitytoolkit.googleapis.com/v1".to_string());

        let token_url = env::var("AUTH_TOKEN_URL")
            .unwrap_or_else(|_| "https://securetoken.googleapis.com/v1/token".to_string());

        Ok(Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            api_key,
            token_url,
        })
    }
}

impl GeocodingConfig {
    const DEFAULT_TIMEOUT_SECS: u64 = 4;
    const DEFAULT_BATCH_SIZE: usize = 5;
    const DEFAULT_CACHE_CAPACITY: u64 = 10_000;
    // Los Angeles
    const DEFAULT_CENTER_LAT: f64 = 34.0522;
    const DEFAULT_CENTER_LON: f64 = -118.2437;
    const DEFAULT_JITTER_DEG: f64 = 0.05;
    const DEFAULT_RADIUS_MILES: f64 = 25.0;

    pub fn from_env() -> Result<Self, String> {
        let base_url = env::var("GEOCODE_BASE_URL")
            .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_string());

        let user_agent = env::var("GEOCODE_USER_AGENT")
            .unwrap_or_else(|_| "EpokCore/1.0 (vendor-directory)".to_string());

        let timeout_secs = env::var("GEOCODE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "GEOCODE_TIMEOUT_SECS must be a valid number".to_string())?;

        let batch_size = env::var("GEOCODE_BATCH_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_BATCH_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "GEOCODE_BATCH_SIZE must be a valid number".to_string())?;

        let cache_capacity = env::var("GEOCODE_CACHE_CAPACITY")
            .unwrap_or_else(|_| Self::DEFAULT_CACHE_CAPACITY.to_string())
            .parse::<u64>()
            .map_err(|_| "GEOCODE_CACHE_CAPACITY must be a valid number".to_string())?;

        let default_center_lat = env::var("GEOCODE_DEFAULT_LAT")
            .unwrap_or_else(|_| Self::DEFAULT_CENTER_LAT.to_string())
            .parse::<f64>()
            .map_err(|_| "GEOCODE_DEFAULT_LAT must be a valid number".to_string())?;

        let default_center_lon = env::var("GEOCODE_DEFAULT_LON")
            .unwrap_or_else(|_| Self::DEFAULT_CENTER_LON.to_string())
            .parse::<f64>()
            .map_err(|_| "GEOCODE_DEFAULT_LON must be a valid number".to_string())?;

        let synthetic_jitter_deg = env::var("GEOCODE_SYNTHETIC_JITTER_DEG")
            .unwrap_or_else(|_| Self::DEFAULT_JITTER_DEG.to_string())
            .parse::<f64>()
            .map_err(|_| "GEOCODE_SYNTHETIC_JITTER_DEG must be a valid number".to_string())?;

        let allow_synthetic = env::var("GEOCODE_ALLOW_SYNTHETIC")
            .unwrap_or_else(|_| "true".to_string())
            .parse::<bool>()
            .map_err(|_| "GEOCODE_ALLOW_SYNTHETIC must be true or false".to_string())?;

        let default_radius_miles = env::var("SEARCH_RADIUS_MILES")
            .unwrap_or_else(|_| Self::DEFAULT_RADIUS_MILES.to_string())
            .parse::<f64>()
            .map_err(|_| "SEARCH_RADIUS_MILES must be a valid number".to_string())?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent,
            timeout: Duration::from_secs(timeout_secs),
            batch_size: batch_size.max(1),
            cache_capacity: cache_capacity.max(1),
            default_center_lat,
            default_center_lon,
            synthetic_jitter_deg,
            allow_synthetic,
            default_radius_miles,
        })
    }
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: "EpokCore/1.0 (vendor-directory)".to_string(),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            batch_size: Self::DEFAULT_BATCH_SIZE,
            cache_capacity: Self::DEFAULT_CACHE_CAPACITY,
            default_center_lat: Self::DEFAULT_CENTER_LAT,
            default_center_lon: Self::DEFAULT_CENTER_LON,
            synthetic_jitter_deg: Self::DEFAULT_JITTER_DEG,
            allow_synthetic: true,
            default_radius_miles: Self::DEFAULT_RADIUS_MILES,
        }
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "EPOK API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "API documentation for the EPOK vendor directory".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

impl MinIOConfig {
    pub fn from_env() -> Result<Self, String> {
        let endpoint =
            env::var("MINIO_ENDPOINT").unwrap_or_else(|_| "http://localhost:9000".to_string());

        let public_endpoint =
            env::var("MINIO_PUBLIC_ENDPOINT").unwrap_or_else(|_| endpoint.clone());

        let access_key = env::var("MINIO_ACCESS_KEY").unwrap_or_else(|_| "minioadmin".to_string());

        let secret_key = env::var("MINIO_SECRET_KEY").unwrap_or_else(|_| "minioadmin".to_string());

        let bucket = env::var("MINIO_BUCKET").unwrap_or_else(|_| "epok-uploads".to_string());

        let region = env::var("MINIO_REGION").unwrap_or_else(|_| "us-east-1".to_string());

        let public_prefix =
            env::var("MINIO_PUBLIC_PREFIX").unwrap_or_else(|_| "public".to_string());

        Ok(Self {
            endpoint,
            public_endpoint,
            access_key,
            secret_key,
            bucket,
            region,
            public_prefix,
        })
    }
}
