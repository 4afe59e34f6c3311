pub mod alert_rule;
