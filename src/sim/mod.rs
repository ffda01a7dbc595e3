//! 仿真核心模块
//!
//! 此模块包含离散事件仿真的核心组件：仿真时间、事件、调度器与更新过程生成。

// 子模块声明
mod event;
mod renewal;
mod scheduled_event;
mod scheduler;
mod time;

// 重新导出公共接口
pub use event::{Event, EventKind};
pub use renewal::{MAX_STREAM_EVENTS, renewal_times};
pub use scheduled_event::ScheduledEvent;
pub use scheduler::EventScheduler;
pub use time::SimTime;
