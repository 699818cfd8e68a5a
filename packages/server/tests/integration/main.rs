mod common;

mod conditional;
mod thumbnails;
