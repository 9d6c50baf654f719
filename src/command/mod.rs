pub mod db;
pub mod sync_lights;
