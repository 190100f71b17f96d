pub mod family_service;
pub mod goal_service;
pub mod history_service;
pub mod money_service;
pub mod ride_service;
pub mod score_service;
pub mod validation;
