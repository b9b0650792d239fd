pub mod domain;
pub mod ports;

pub use domain::{
    AuthResult, Confirmation, Credentials, Dialog, Director, Genre, Movie, NewUser,
    ProfileUpdate, Route, Session, User,
};
pub use ports::{MovieApi, PortError, PortResult, SessionStore, UiShell};
