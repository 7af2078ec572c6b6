//! 日志工具模块
//!
//! 封装 flexi_logger 的初始化和关闭操作，确保异步日志正确 flush。
//! 语句执行的debug日志依赖这里初始化的全局logger。

use crate::config::LogConfig;
use crate::core::error::{AccessError, AccessResult};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use parking_lot::Mutex;

/// 全局日志句柄，用于程序退出时 flush
static LOGGER_HANDLE: Mutex<Option<LoggerHandle>> = Mutex::new(None);

/// 初始化日志系统
pub fn init(config: &LogConfig) -> AccessResult<()> {
    let handle = Logger::try_with_str(&config.level)
        .map_err(|e| AccessError::Config(format!("invalid log level: {}", e)))?
        .log_to_file(
            FileSpec::default()
                .basename(&config.file)
                .directory(&config.dir),
        )
        .rotate(
            Criterion::Size(config.max_file_size),
            Naming::Numbers,
            Cleanup::KeepLogFiles(config.max_files),
        )
        .write_mode(WriteMode::Async)
        .append()
        .start()
        .map_err(|e| AccessError::Config(format!("logger start failed: {}", e)))?;

    // 保存句柄供后续 flush 使用
    *LOGGER_HANDLE.lock() = Some(handle);

    log::info!("日志系统初始化完成: {}/{}", config.dir, config.file);
    Ok(())
}

/// 刷新并关闭日志系统
///
/// 在程序退出前调用，确保所有异步日志都已写入文件。
/// 这是一个阻塞操作，会等待日志线程完成当前工作。
pub fn shutdown() {
    if let Some(handle) = LOGGER_HANDLE.lock().take() {
        handle.flush();
        // handle 在这里被 drop，会等待异步线程完成
    }
}

/// 检查日志系统是否已初始化
pub fn is_initialized() -> bool {
    LOGGER_HANDLE.lock().is_some()
}
