mod profile;
mod resource_list;

pub use profile::ProfileView;
pub use resource_list::ResourceListView;
