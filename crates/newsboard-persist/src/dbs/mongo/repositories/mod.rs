mod newspaper;
mod post;
mod thread;

pub use newspaper::MongoNewspaperRepository;
pub use post::MongoPostRepository;
pub use thread::MongoThreadRepository;
