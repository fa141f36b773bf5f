pub use self::{
    path::get_path,
    types::{DataBase, PoolOption, PoolType},
};

mod cryptocurrency;
mod historical_price;
mod path;
mod types;
