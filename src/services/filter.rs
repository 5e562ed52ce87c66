//! 栈成员过滤
//!
//! 前缀匹配 + 排除自身容器，以及按运行状态划分

use crate::domain::StackContainer;

#[derive(Debug, Clone)]
pub struct StackFilter {
    prefix: String,
    self_container: String,
}

impl StackFilter {
    pub fn new(prefix: impl Into<String>, self_container: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            self_container: self_container.into(),
        }
    }

    /// 运行时的 name 过滤是子串匹配，这里再收紧为前缀匹配
    pub fn is_member(&self, name: &str) -> bool {
        name.starts_with(&self.prefix) && name != self.self_container
    }

    pub fn apply(&self, containers: Vec<StackContainer>) -> Vec<StackContainer> {
        containers
            .into_iter()
            .filter(|c| self.is_member(&c.name))
            .collect()
    }
}

/// 划分为 (running, not running)
pub fn partition_running(
    containers: &[StackContainer],
) -> (Vec<&StackContainer>, Vec<&StackContainer>) {
    containers.iter().partition(|c| c.is_running())
}
