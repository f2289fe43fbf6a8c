pub mod update_index;
pub mod update_ref;
pub mod write_tree;
