/// 缓存的用户对象
pub const USER_KEY: &str = "user";

/// 访问令牌
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// 刷新令牌
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// 退出登录时需要清除的全部会话键
pub const SESSION_KEYS: [&str; 3] = [USER_KEY, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY];
