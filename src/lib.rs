//! Edupravahaa - 在线教育平台后端服务
//!
//! 基于 Actix Web 构建，提供账号、课程、教师排课与付费订阅等接口。
//!
//! # 架构
//! - `cache`: 缓存层（Moka/Redis），验证码与会话吊销
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `middlewares`: 认证授权与限流中间件
//! - `models`: 数据模型定义
//! - `notifications`: 邮件与短信通知
//! - `payments`: 支付网关与签名校验
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `scheduling`: 班次排课、课时展开与冲突检测
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod notifications;
pub mod payments;
pub mod routes;
pub mod runtime;
pub mod scheduling;
pub mod services;
pub mod storage;
pub mod utils;
