pub mod memo_service;
