pub mod get_notification_attempts;
pub mod get_queue_stats;
pub mod list_dead_letters;
pub mod list_pending;
pub mod report_voyage;
pub mod requeue_dead_letter;
pub mod submit_notification;
