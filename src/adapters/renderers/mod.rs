pub mod nginx_site;
pub mod openssl_command;
pub mod uwsgi_ini;
