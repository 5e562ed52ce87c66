//! 测试用内存运行时与部署器

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::domain::{HealthState, PortBinding, StackContainer};
use crate::error::{DeployError, RuntimeError};

use super::runtime::{ContainerRuntime, StackDeployer};

/// 运行时调用记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Start(String),
    Stop(String, Duration),
    Restart(String, Duration),
    Logs(String, usize),
}

#[derive(Default)]
pub struct FakeRuntime {
    containers: Mutex<Vec<StackContainer>>,
    health: Mutex<HashMap<String, HealthState>>,
    logs: Mutex<HashMap<String, String>>,
    failing: Mutex<HashSet<String>>,
    list_fails: Mutex<bool>,
    calls: Mutex<Vec<Call>>,
}

impl FakeRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加容器，id 与名称相同
    pub fn with_container(self, name: &str, state: &str) -> Self {
        self.containers.lock().unwrap().push(StackContainer {
            id: name.to_string(),
            name: name.to_string(),
            state: state.to_string(),
            status: if state == "running" {
                "Up 3 minutes".to_string()
            } else {
                "Exited (0) 1 minute ago".to_string()
            },
            ports: Vec::new(),
        });
        self
    }

    pub fn with_ports(self, name: &str, ports: Vec<PortBinding>) -> Self {
        if let Some(c) = self
            .containers
            .lock()
            .unwrap()
            .iter_mut()
            .find(|c| c.name == name)
        {
            c.ports = ports;
        }
        self
    }

    pub fn with_health(self, name: &str, health: HealthState) -> Self {
        self.health.lock().unwrap().insert(name.to_string(), health);
        self
    }

    pub fn with_logs(self, name: &str, text: &str) -> Self {
        self.logs
            .lock()
            .unwrap()
            .insert(name.to_string(), text.to_string());
        self
    }

    /// 针对该容器的所有变更/查询操作都会失败
    pub fn failing(self, name: &str) -> Self {
        self.failing.lock().unwrap().insert(name.to_string());
        self
    }

    pub fn failing_list(self) -> Self {
        *self.list_fails.lock().unwrap() = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// 是否发生过任何变更操作
    pub fn mutated(&self) -> bool {
        self.calls()
            .iter()
            .any(|c| !matches!(c, Call::Logs(..)))
    }

    pub fn state_of(&self, name: &str) -> Option<String> {
        self.containers
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.state.clone())
    }

    fn check(&self, id: &str) -> Result<(), RuntimeError> {
        if self.failing.lock().unwrap().contains(id) {
            return Err(RuntimeError::Api(format!("simulated failure for {}", id)));
        }
        Ok(())
    }

    fn set_state(&self, id: &str, state: &str) -> Result<(), RuntimeError> {
        let mut containers = self.containers.lock().unwrap();
        let container = containers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| RuntimeError::ContainerNotFound(id.to_string()))?;
        container.state = state.to_string();
        Ok(())
    }
}

#[async_trait]
impl ContainerRuntime for FakeRuntime {
    async fn list_containers(&self, name_filter: &str) -> Result<Vec<StackContainer>, RuntimeError> {
        if *self.list_fails.lock().unwrap() {
            return Err(RuntimeError::Api("connection refused".to_string()));
        }
        // 与 Docker 的 name 过滤一致：子串匹配
        Ok(self
            .containers
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.name.contains(name_filter))
            .cloned()
            .collect())
    }

    async fn health(&self, id: &str) -> Result<HealthState, RuntimeError> {
        self.check(id)?;
        Ok(self
            .health
            .lock()
            .unwrap()
            .get(id)
            .copied()
            .unwrap_or(HealthState::NotConfigured))
    }

    async fn start(&self, id: &str) -> Result<(), RuntimeError> {
        self.calls.lock().unwrap().push(Call::Start(id.to_string()));
        self.check(id)?;
        self.set_state(id, "running")
    }

    async fn stop(&self, id: &str, grace: Duration) -> Result<(), RuntimeError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Stop(id.to_string(), grace));
        self.check(id)?;
        self.set_state(id, "exited")
    }

    async fn restart(&self, id: &str, grace: Duration) -> Result<(), RuntimeError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Restart(id.to_string(), grace));
        self.check(id)?;
        self.set_state(id, "running")
    }

    async fn logs(&self, id: &str, tail: usize) -> Result<String, RuntimeError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Logs(id.to_string(), tail));
        self.check(id)?;
        Ok(self.logs.lock().unwrap().get(id).cloned().unwrap_or_default())
    }

    async fn ping(&self) -> Result<(), RuntimeError> {
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeDeployer {
    invocations: AtomicUsize,
    fail_with: Option<String>,
}

impl FakeDeployer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(output: &str) -> Self {
        Self {
            invocations: AtomicUsize::new(0),
            fail_with: Some(output.to_string()),
        }
    }

    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StackDeployer for FakeDeployer {
    async fn bring_up(&self) -> Result<String, DeployError> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        match &self.fail_with {
            Some(output) => Err(DeployError::Failed {
                code: Some(1),
                output: output.clone(),
            }),
            None => Ok("Container penpot-frontend  Started".to_string()),
        }
    }
}
