//! 配置校验模块
//!
//! 校验规则：
//! - 消息模板必填字段齐全、地址格式合法
//! - body 与 body_file 互斥
//! - delay_ms > 0
//! - transport 参数合法 (endpoint 为 http(s) URL, timeout_ms > 0, program 非空)
//!
//! 收件人列表不在此处校验，由 dispatcher 在 start 时整体校验。

use contracts::{CampaignConfig, ContractError, DispatchSettings, MessageTemplate, TransportConfig};
use validator::Validate;

/// 校验 CampaignConfig 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(config: &CampaignConfig) -> Result<(), ContractError> {
    validate_message(&config.message)?;
    validate_dispatch(&config.dispatch)?;
    validate_transport(&config.transport)?;
    Ok(())
}

/// 校验消息模板
///
/// 多个字段出错时按字段名排序，报告第一个。
fn validate_message(message: &MessageTemplate) -> Result<(), ContractError> {
    if let Err(errors) = message.validate() {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        if let Some((field, errs)) = fields.into_iter().next() {
            let reason = errs
                .iter()
                .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| format!("{field} is invalid"));
            return Err(ContractError::config_validation(
                format!("message.{field}"),
                reason,
            ));
        }
    }
    Ok(())
}

/// 校验发送节奏
fn validate_dispatch(dispatch: &DispatchSettings) -> Result<(), ContractError> {
    if dispatch.delay_ms == 0 {
        return Err(ContractError::config_validation(
            "dispatch.delay_ms",
            "delay_ms must be > 0",
        ));
    }
    Ok(())
}

/// 校验 transport 参数
fn validate_transport(transport: &TransportConfig) -> Result<(), ContractError> {
    match transport {
        TransportConfig::Http {
            endpoint,
            timeout_ms,
        } => {
            if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                return Err(ContractError::config_validation(
                    "transport.endpoint",
                    format!("endpoint must be an http(s) URL, got '{endpoint}'"),
                ));
            }
            if *timeout_ms == 0 {
                return Err(ContractError::config_validation(
                    "transport.timeout_ms",
                    "timeout_ms must be > 0",
                ));
            }
        }
        TransportConfig::Sendmail { program, .. } => {
            if program.as_os_str().is_empty() {
                return Err(ContractError::config_validation(
                    "transport.program",
                    "sendmail program cannot be empty",
                ));
            }
        }
        TransportConfig::DryRun => {}
    }
    Ok(())
}
