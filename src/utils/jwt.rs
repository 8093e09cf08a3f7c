use crate::config::AppConfig;
use actix_web::cookie::{Cookie, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

const REFRESH_COOKIE: &str = "refresh_token";

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // 用户 ID
    pub role: String,       // 用户角色
    pub token_type: String, // "access" 或 "refresh"
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

pub struct JwtUtils;

impl JwtUtils {
    fn secret() -> &'static str {
        &AppConfig::get().jwt.secret
    }

    /// 签发指定类型和有效期的 token
    pub fn issue(
        user_id: i64,
        role: &str,
        token_type: &str,
        ttl: chrono::Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            token_type: token_type.to_string(),
            exp: (now + ttl).timestamp() as usize,
            iat: now.timestamp() as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(Self::secret().as_bytes()),
        )
    }

    pub fn access_token_ttl() -> chrono::Duration {
        chrono::Duration::minutes(AppConfig::get().jwt.access_token_expiry)
    }

    /// refresh token 有效期，勾选“记住我”时使用更长的有效期
    pub fn refresh_token_ttl(remember_me: bool) -> chrono::Duration {
        let jwt = &AppConfig::get().jwt;
        if remember_me {
            chrono::Duration::days(jwt.refresh_token_remember_me_expiry)
        } else {
            chrono::Duration::days(jwt.refresh_token_expiry)
        }
    }

    pub fn generate_access_token(
        user_id: i64,
        role: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        Self::issue(user_id, role, "access", Self::access_token_ttl())
    }

    pub fn generate_token_pair(
        user_id: i64,
        role: &str,
        remember_me: bool,
    ) -> Result<TokenPair, jsonwebtoken::errors::Error> {
        Ok(TokenPair {
            access_token: Self::generate_access_token(user_id, role)?,
            refresh_token: Self::issue(
                user_id,
                role,
                "refresh",
                Self::refresh_token_ttl(remember_me),
            )?,
        })
    }

    fn verify_token_type(
        token: &str,
        expected_type: &str,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(Self::secret().as_bytes()),
            &Validation::default(),
        )?
        .claims;
        if claims.token_type != expected_type {
            return Err(jsonwebtoken::errors::ErrorKind::InvalidToken.into());
        }
        Ok(claims)
    }

    pub fn verify_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify_token_type(token, "access")
    }

    pub fn verify_refresh_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify_token_type(token, "refresh")
    }

    fn build_cookie(value: String, max_age: actix_web::cookie::time::Duration) -> Cookie<'static> {
        Cookie::build(REFRESH_COOKIE, value)
            .path("/")
            .max_age(max_age)
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(AppConfig::get().is_production())
            .finish()
    }

    pub fn create_refresh_token_cookie(refresh_token: &str, remember_me: bool) -> Cookie<'static> {
        let ttl = Self::refresh_token_ttl(remember_me);
        Self::build_cookie(
            refresh_token.to_string(),
            actix_web::cookie::time::Duration::seconds(ttl.num_seconds()),
        )
    }

    /// 注销时下发的空 cookie
    pub fn create_empty_refresh_token_cookie() -> Cookie<'static> {
        Self::build_cookie(String::new(), actix_web::cookie::time::Duration::seconds(0))
    }

    pub fn extract_refresh_token_from_cookie(req: &actix_web::HttpRequest) -> Option<String> {
        req.cookie(REFRESH_COOKIE)
            .map(|cookie| cookie.value().to_string())
    }
}
