pub mod commit_info_dto;
