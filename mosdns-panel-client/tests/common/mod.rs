//! 面板集成测试的共享上下文

#![allow(dead_code)]

use std::env;

use mosdns_panel_client::HttpPanelBackend;

/// 面板地址未配置时直接跳过当前测试
#[macro_export]
macro_rules! skip_if_no_panel {
    () => {
        if std::env::var("MOSDNS_PANEL_URL").is_err() {
            eprintln!("跳过测试: 未设置 MOSDNS_PANEL_URL");
            return;
        }
    };
}

/// 集成测试上下文，指向一个真实运行的面板后端
pub struct TestContext {
    pub backend: HttpPanelBackend,
    pub base_url: String,
}

impl TestContext {
    /// 从环境变量创建测试上下文
    ///
    /// 需要 `MOSDNS_PANEL_URL`，如 `http://192.168.1.1:8190`。
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("MOSDNS_PANEL_URL").ok()?;
        Some(Self {
            backend: HttpPanelBackend::new(&base_url),
            base_url,
        })
    }
}
