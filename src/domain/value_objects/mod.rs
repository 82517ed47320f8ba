pub mod role_rank;
