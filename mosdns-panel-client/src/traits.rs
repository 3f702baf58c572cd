use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    ConfigStatus, ConfigTreePayload, DownloadReport, KernelUpdateReport, LogsPayload, ReleaseInfo,
    SaveFileAck, SaveListAck, ServiceSnapshot, SettingsPayload, SwitchPayload,
};

/// 面板后端 Trait
///
/// 覆盖面板依赖的全部 REST 操作。`HttpPanelBackend` 是默认实现，
/// 测试中可用内存 Mock 替换。
#[async_trait]
pub trait PanelBackend: Send + Sync {
    // ============ 服务生命周期 ============

    /// 获取服务状态快照
    async fn fetch_service_status(&self) -> Result<ServiceSnapshot>;

    /// 启动服务
    async fn start_service(&self) -> Result<ServiceSnapshot>;

    /// 停止服务
    async fn stop_service(&self) -> Result<ServiceSnapshot>;

    /// 重启服务
    async fn restart_service(&self) -> Result<ServiceSnapshot>;

    // ============ 日志 ============

    /// 获取服务日志（未过滤）
    async fn fetch_logs(&self) -> Result<LogsPayload>;

    // ============ 配置文件 ============

    /// 获取主配置文件状态
    async fn fetch_config_status(&self) -> Result<ConfigStatus>;

    /// 更新主配置文件路径，返回更新后的状态
    async fn update_config_path(&self, path: &str) -> Result<ConfigStatus>;

    /// 下载并改写配置模板
    async fn download_config(&self) -> Result<DownloadReport>;

    /// 获取配置目录树（含文件内容）
    async fn fetch_config_tree(&self) -> Result<ConfigTreePayload>;

    /// 保存单个配置文件
    async fn save_config_file(&self, path: &str, content: &str) -> Result<SaveFileAck>;

    // ============ 设置 ============

    /// 获取设置存储（扁平字符串键值对）
    async fn fetch_settings(&self) -> Result<SettingsPayload>;

    /// 保存设置（部分更新），返回合并后的存储
    async fn save_settings(&self, values: &HashMap<String, String>) -> Result<SettingsPayload>;

    // ============ 规则列表与开关 ============

    /// 获取规则列表原始文本
    async fn fetch_list(&self, tag: &str) -> Result<String>;

    /// 整体替换规则列表
    async fn save_list(&self, tag: &str, values: &[String]) -> Result<SaveListAck>;

    /// 读取开关值
    async fn fetch_switch(&self, tag: &str) -> Result<SwitchPayload>;

    /// 写入开关值（后端要求非空）
    async fn save_switch(&self, tag: &str, value: &str) -> Result<SwitchPayload>;

    // ============ 内核更新 ============

    /// 查询最新内核发布
    async fn fetch_latest_release(&self) -> Result<ReleaseInfo>;

    /// 下载并安装最新内核
    async fn update_kernel(&self) -> Result<KernelUpdateReport>;
}
